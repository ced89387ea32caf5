//! Screen-zone labels on a 3×3 grid.

/// Grid coordinates: x is horizontal (left=0, center=1, right=2), y is vertical (top=0, middle=1, bottom=2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonePoint {
    pub x: u8,
    pub y: u8,
}

/// Parse `"<vertical>_<horizontal>"`. Anything else is `None`.
pub fn zone_to_xy(zone: &str) -> Option<ZonePoint> {
    let (vertical, horizontal) = zone.split_once('_')?;
    let y = match vertical {
        "top" => 0,
        "middle" => 1,
        "bottom" => 2,
        _ => return None,
    };
    let x = match horizontal {
        "left" => 0,
        "center" => 1,
        "right" => 2,
        _ => return None,
    };
    Some(ZonePoint { x, y })
}
