//! Selection transfer between a surface and the engine.

use crate::core::selection::Selection;
use crate::core::text_edit;
use crate::surface::TextSurface;
use log::trace;

pub fn read_selection<S: TextSurface + ?Sized>(surface: &S) -> Selection {
    let selection = surface.selection();
    trace!("read selection {:?}", selection);
    selection
}

/// Out-of-range offsets are clamped to the surface value.
pub fn write_selection<S: TextSurface + ?Sized>(surface: &mut S, selection: Selection) {
    let selection = selection.clamp(text_edit::char_count(surface.value()));
    trace!("write selection {:?}", selection);
    surface.set_selection(selection);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    #[test]
    fn write_clamps_to_surface_length() {
        let mut surface = MemorySurface::new("(5__)");
        write_selection(&mut surface, Selection::new(2, 40));
        assert_eq!(read_selection(&surface), Selection::new(2, 5));
    }

    #[test]
    fn read_returns_surface_selection() {
        let mut surface = MemorySurface::new("abc");
        surface.set_selection(Selection::new(0, 2));
        assert_eq!(read_selection(&surface), Selection::new(0, 2));
    }
}
