use crate::common::config::GapSettings;
use crate::model::Rect;

pub fn compute_tiling_area(working_area: Rect, gaps: &GapSettings) -> Rect {
    let outer = &gaps.outer;
    if outer.top == 0 && outer.left == 0 && outer.bottom == 0 && outer.right == 0 {
        working_area
    } else {
        working_area.inset(outer.top, outer.left, outer.bottom, outer.right)
    }
}
