use hades_boot::uprintln;

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    uprintln!("ERROR: Bootloader panic: {}", info);
    loop {}
}
