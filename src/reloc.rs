/// The loader's own image: where the linker put it in boot storage and the
/// RAM range it has to run from.
#[derive(Copy, Clone, Debug)]
pub struct BootImage {
    load: *const u8,
    start: *mut u8,
    end: *mut u8,
}

impl BootImage {
    /// # Safety
    ///
    /// `load` must be readable for `end - start` bytes, `start..end` must be
    /// writable, and the two ranges must not overlap.
    #[inline(always)]
    pub const unsafe fn new(load: *const u8, start: *mut u8, end: *mut u8) -> Self {
        Self { load, start, end }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        (self.end as usize).saturating_sub(self.start as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the image to its execution range, one byte at a time.
    ///
    /// Runs before the execution range holds any code, so it has to be
    /// inlined into its caller and must not turn into a library call.
    ///
    /// # Safety
    ///
    /// Interrupts must be disabled and nothing may be executing from the
    /// execution range.
    #[inline(always)]
    pub unsafe fn relocate(&self) {
        let len = self.len();
        let mut i = 0;
        while i < len {
            core::ptr::write_volatile(self.start.add(i), core::ptr::read_volatile(self.load.add(i)));
            i = i.wrapping_add(1);
        }
    }
}
