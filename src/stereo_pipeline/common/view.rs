use std::fmt;

/// One of the two camera perspectives of the stereo rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StereoView {
    Left,
    Right,
}

impl StereoView {
    pub const ALL: [StereoView; 2] = [StereoView::Left, StereoView::Right];

    /// Key used for this view throughout the canonical metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            StereoView::Left => "left",
            StereoView::Right => "right",
        }
    }
}

impl fmt::Display for StereoView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
