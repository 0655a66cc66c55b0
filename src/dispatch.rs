/// Hands control to a freshly programmed image.
///
/// `launch` is not expected to return. If the program does come back, the
/// caller simply starts a new boot session.
pub trait Launch {
    fn launch(&mut self, entry: u32);
}

/// Jumps to the entry point with a plain `jalr`, so any address, including
/// zero, is a valid target.
pub struct Jump;

impl Launch for Jump {
    #[cfg(target_arch = "riscv32")]
    fn launch(&mut self, entry: u32) {
        unsafe {
            core::arch::asm!(
                // The image was written through the data path; drop any
                // stale instructions before fetching from it.
                "fence.i",
                "jalr ra, 0({entry})",
                entry = in(reg) entry,
                clobber_abi("C"),
            );
        }
    }

    // Nothing to enter off target.
    #[cfg(not(target_arch = "riscv32"))]
    fn launch(&mut self, _entry: u32) {}
}
