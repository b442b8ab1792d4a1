use std::fmt;

/// Number of corners on the overlay background quad.
pub const CORNER_COUNT: usize = 4;

/// Packed `0xAARRGGBB` color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Argb32(pub u32);

impl Argb32 {
    pub const TRANSPARENT: Argb32 = Argb32(0);

    pub const fn from_argb(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self((alpha as u32) << 24 | (red as u32) << 16 | (green as u32) << 8 | blue as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Channel-wise linear interpolation from transparent black toward `self`.
    ///
    /// Straight alpha, no gamma handling: every channel (alpha included) is
    /// `round(progress * channel)`.
    pub fn scaled_from_transparent(self, progress: f32) -> Self {
        let progress = progress.clamp(0.0, 1.0);
        let scale = |channel: u8| (progress * channel as f32).round() as u8;
        Self::from_argb(
            scale(self.alpha()),
            scale(self.red()),
            scale(self.green()),
            scale(self.blue()),
        )
    }

    /// Normalised straight-alpha RGBA, as consumed by vertex buffers.
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.red() as f32 / 255.0,
            self.green() as f32 / 255.0,
            self.blue() as f32 / 255.0,
            self.alpha() as f32 / 255.0,
        ]
    }
}

impl From<u32> for Argb32 {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Argb32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

/// Geometric corners of the background quad, in winding order.
///
/// The discriminant is the index into corner color arrays, so iterating
/// [`Corner::WINDING`] visits colors in storage order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    TopRight = 0,
    TopLeft = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Corner {
    pub const WINDING: [Corner; CORNER_COUNT] = [
        Corner::TopRight,
        Corner::TopLeft,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Reorders colors listed clockwise from the top-left corner (the settings
/// file convention) into winding order.
pub fn winding_from_clockwise(clockwise: [u32; CORNER_COUNT]) -> [Argb32; CORNER_COUNT] {
    let [top_left, top_right, bottom_right, bottom_left] = clockwise;
    [
        Argb32(top_right),
        Argb32(top_left),
        Argb32(bottom_left),
        Argb32(bottom_right),
    ]
}

/// Axis-aligned rectangle in target pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    pub fn corner(&self, corner: Corner) -> (f32, f32) {
        match corner {
            Corner::TopRight => (self.right, self.top),
            Corner::TopLeft => (self.left, self.top),
            Corner::BottomLeft => (self.left, self.bottom),
            Corner::BottomRight => (self.right, self.bottom),
        }
    }
}

/// Host window focus flags sampled once per host tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowFocus {
    pub active: bool,
    pub minimized: bool,
}

impl WindowFocus {
    pub const ACTIVE: WindowFocus = WindowFocus {
        active: true,
        minimized: false,
    };
    pub const INACTIVE: WindowFocus = WindowFocus {
        active: false,
        minimized: false,
    };
    pub const MINIMIZED: WindowFocus = WindowFocus {
        active: false,
        minimized: true,
    };
}

/// Host audio channel the volume duck applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AudioChannel {
    #[default]
    Master,
    Music,
    Effects,
    Voice,
}

impl From<prefs::ChannelName> for AudioChannel {
    fn from(value: prefs::ChannelName) -> Self {
        match value {
            prefs::ChannelName::Master => AudioChannel::Master,
            prefs::ChannelName::Music => AudioChannel::Music,
            prefs::ChannelName::Effects => AudioChannel::Effects,
            prefs::ChannelName::Voice => AudioChannel::Voice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_unpack_from_argb() {
        let color = Argb32(0x80_11_22_33);
        assert_eq!(color.alpha(), 0x80);
        assert_eq!(color.red(), 0x11);
        assert_eq!(color.green(), 0x22);
        assert_eq!(color.blue(), 0x33);
        assert_eq!(Argb32::from_argb(0x80, 0x11, 0x22, 0x33), color);
    }

    #[test]
    fn scaling_rounds_each_channel() {
        let target = Argb32::from_argb(0x99, 0xFF, 0x10, 0x01);
        for p in [0.0f32, 0.25, 0.5, 0.75, 1.0] {
            let scaled = target.scaled_from_transparent(p);
            assert_eq!(scaled.alpha(), (p * 0x99 as f32).round() as u8);
            assert_eq!(scaled.red(), (p * 0xFF as f32).round() as u8);
            assert_eq!(scaled.green(), (p * 0x10 as f32).round() as u8);
            assert_eq!(scaled.blue(), (p * 0x01 as f32).round() as u8);
        }
        assert_eq!(target.scaled_from_transparent(0.0), Argb32::TRANSPARENT);
        assert_eq!(target.scaled_from_transparent(1.0), target);
    }

    #[test]
    fn clockwise_colors_map_to_winding_order() {
        let winding = winding_from_clockwise([1, 2, 3, 4]);
        assert_eq!(winding[Corner::TopLeft.index()], Argb32(1));
        assert_eq!(winding[Corner::TopRight.index()], Argb32(2));
        assert_eq!(winding[Corner::BottomRight.index()], Argb32(3));
        assert_eq!(winding[Corner::BottomLeft.index()], Argb32(4));
    }

    #[test]
    fn rect_corners_follow_screen_axes() {
        let rect = Rect::new(10.0, 20.0, 110.0, 220.0);
        assert_eq!(rect.corner(Corner::TopRight), (110.0, 20.0));
        assert_eq!(rect.corner(Corner::BottomLeft), (10.0, 220.0));
    }
}
