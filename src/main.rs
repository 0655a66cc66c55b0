#![no_std]
#![no_main]

mod boot;
mod lang_items;
