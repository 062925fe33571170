//! Flash page programming interface
//!
//! Mirrors the self-programming unit's operation set: erase a page, fill
//! the hardware page buffer one word at a time, commit, wait for the unit
//! to go idle, and re-enable reads of the programmed region. The unit has
//! no failure reporting, only a busy flag, so the operations are
//! infallible; completion is observed through `busy_wait`.

/// Page-granular flash programming.
///
/// `addr` is a byte address; fills are little-endian words at ascending
/// offsets within the page selected by `page_erase`/`page_write`.
pub trait Flash {
    fn page_erase(&mut self, addr: u16);
    fn page_fill(&mut self, addr: u16, word: u16);
    fn page_write(&mut self, addr: u16);
    fn busy_wait(&mut self);
    fn rww_enable(&mut self);
}
