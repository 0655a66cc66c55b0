use core::ptr::{addr_of, addr_of_mut};

use hades_boot::consts::UART_BASE;
use hades_boot::dispatch::Jump;
use hades_boot::mem::{PhysicalMemory, RamWindow};
use hades_boot::reloc::BootImage;
use hades_boot::serial::HadesUart;

// Provided by link.ld
extern "C" {
    static __boot_load: u8;
    static mut __boot_start: u8;
    static mut __boot_end: u8;
    static __ram_start: u8;
}

macro_rules! clear_reg {
    ($x:ident) => {
        concat!("li ", stringify!($x), ", 0")
    };
}

/// Reset vector. Runs from boot storage.
#[no_mangle]
#[link_section = ".text.entry"]
#[unsafe(naked)]
pub unsafe extern "C" fn _start() -> ! {
    core::arch::naked_asm!(
        // Interrupts stay off for the whole life of the loader
        "csrw mie, zero",

        clear_reg!(ra),
        clear_reg!(gp),
        clear_reg!(tp),

        "la sp, __ram_end",

        "j relocate",
    )
}

/// Copies the loader to RAM and enters the copy. Lives in boot storage next
/// to the reset vector, so everything it does must be inlined.
#[no_mangle]
#[link_section = ".text.relocate"]
unsafe extern "C" fn relocate() -> ! {
    let image = BootImage::new(
        addr_of!(__boot_load),
        addr_of_mut!(__boot_start),
        addr_of_mut!(__boot_end),
    );
    image.relocate();

    core::arch::asm!("fence.i");

    boot_main()
}

#[no_mangle]
extern "C" fn boot_main() -> ! {
    unsafe {
        // Without a logger the loader still works, it just stays quiet.
        let _ = hades_boot::logger::init_logger();
    }

    let window = unsafe {
        RamWindow::new(
            addr_of!(__ram_start) as usize as u32,
            addr_of!(__boot_start) as usize as u32,
        )
    };
    let mut uart = HadesUart::new(UART_BASE);
    let mut memory = unsafe { PhysicalMemory::new() };

    hades_boot::session::serve(&mut uart, &mut memory, window, &mut Jump)
}
