use std::cell::RefCell;
use std::rc::Rc;
use crate::chart::Point;
/// Tooltip element a chart can move around and relabel.
pub trait TooltipOverlay {
    /// Shows `text` with the overlay's top-left corner at `position`.
    fn place(&mut self, position: Point, text: &str);
    /// Moves the overlay off-screen.
    fn hide(&mut self);
}
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipPlacement {
    pub position: Point,
    pub text: String,
}
/// Plain tooltip state; `None` means off-screen.
#[derive(Clone, Debug, Default)]
pub struct Tooltip {
    placement: Option<TooltipPlacement>,
}
impl Tooltip {
    pub fn placement(&self) -> Option<&TooltipPlacement> {
        self.placement.as_ref()
    }
    #[cfg(test)]
    pub fn is_visible(&self) -> bool {
        self.placement.is_some()
    }
}
impl TooltipOverlay for Tooltip {
    fn place(&mut self, position: Point, text: &str) {
        self.placement = Some(TooltipPlacement {
            position,
            text: text.to_owned(),
        });
    }
    fn hide(&mut self) {
        self.placement = None;
    }
}
/// Handle to one tooltip shared by several charts on the UI thread.
#[derive(Clone, Debug, Default)]
pub struct SharedTooltip(Rc<RefCell<Tooltip>>);
impl SharedTooltip {
    pub fn placement(&self) -> Option<TooltipPlacement> {
        self.0.borrow().placement().cloned()
    }
}
impl TooltipOverlay for SharedTooltip {
    fn place(&mut self, position: Point, text: &str) {
        self.0.borrow_mut().place(position, text);
    }
    fn hide(&mut self) {
        self.0.borrow_mut().hide();
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn shared_handles_see_the_same_tooltip() {
        let shared = SharedTooltip::default();
        let mut a = shared.clone();
        let mut b = shared.clone();
        a.place(Point::new(4.0, 2.0), "21.5");
        let placement = shared.placement().unwrap();
        assert_eq!(placement.text, "21.5");
        assert_eq!(placement.position, Point::new(4.0, 2.0));
        b.hide();
        assert!(shared.placement().is_none());
    }
}
