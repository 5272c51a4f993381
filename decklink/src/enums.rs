use crate::ffi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Format8BitYUV,
    Format10BitYUV,
    Format8BitARGB,
    Format8BitBGRA,
    Format10BitRGB,
    Unknown(u32),
}

impl PixelFormat {
    pub fn from_raw(value: ffi::BMDPixelFormat) -> Self {
        match value {
            ffi::BMD_FORMAT_8BIT_YUV => Self::Format8BitYUV,
            ffi::BMD_FORMAT_10BIT_YUV => Self::Format10BitYUV,
            ffi::BMD_FORMAT_8BIT_ARGB => Self::Format8BitARGB,
            ffi::BMD_FORMAT_8BIT_BGRA => Self::Format8BitBGRA,
            ffi::BMD_FORMAT_10BIT_RGB => Self::Format10BitRGB,
            other => Self::Unknown(other),
        }
    }

    pub fn into_raw(self) -> ffi::BMDPixelFormat {
        match self {
            Self::Format8BitYUV => ffi::BMD_FORMAT_8BIT_YUV,
            Self::Format10BitYUV => ffi::BMD_FORMAT_10BIT_YUV,
            Self::Format8BitARGB => ffi::BMD_FORMAT_8BIT_ARGB,
            Self::Format8BitBGRA => ffi::BMD_FORMAT_8BIT_BGRA,
            Self::Format10BitRGB => ffi::BMD_FORMAT_10BIT_RGB,
            Self::Unknown(other) => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayModeType {
    ModeNTSC,
    ModePAL,
    ModeHD720p50,
    ModeHD720p5994,
    ModeHD720p60,
    ModeHD1080p2997,
    ModeHD1080p30,
    ModeHD1080i50,
    ModeHD1080i5994,
    ModeHD1080i6000,
    Unknown(u32),
}

impl DisplayModeType {
    pub fn from_raw(value: ffi::BMDDisplayMode) -> Self {
        match value {
            ffi::BMD_MODE_NTSC => Self::ModeNTSC,
            ffi::BMD_MODE_PAL => Self::ModePAL,
            ffi::BMD_MODE_HD720P50 => Self::ModeHD720p50,
            ffi::BMD_MODE_HD720P5994 => Self::ModeHD720p5994,
            ffi::BMD_MODE_HD720P60 => Self::ModeHD720p60,
            ffi::BMD_MODE_HD1080P2997 => Self::ModeHD1080p2997,
            ffi::BMD_MODE_HD1080P30 => Self::ModeHD1080p30,
            ffi::BMD_MODE_HD1080I50 => Self::ModeHD1080i50,
            ffi::BMD_MODE_HD1080I5994 => Self::ModeHD1080i5994,
            ffi::BMD_MODE_HD1080I6000 => Self::ModeHD1080i6000,
            other => Self::Unknown(other),
        }
    }

    pub fn into_raw(self) -> ffi::BMDDisplayMode {
        match self {
            Self::ModeNTSC => ffi::BMD_MODE_NTSC,
            Self::ModePAL => ffi::BMD_MODE_PAL,
            Self::ModeHD720p50 => ffi::BMD_MODE_HD720P50,
            Self::ModeHD720p5994 => ffi::BMD_MODE_HD720P5994,
            Self::ModeHD720p60 => ffi::BMD_MODE_HD720P60,
            Self::ModeHD1080p2997 => ffi::BMD_MODE_HD1080P2997,
            Self::ModeHD1080p30 => ffi::BMD_MODE_HD1080P30,
            Self::ModeHD1080i50 => ffi::BMD_MODE_HD1080I50,
            Self::ModeHD1080i5994 => ffi::BMD_MODE_HD1080I5994,
            Self::ModeHD1080i6000 => ffi::BMD_MODE_HD1080I6000,
            Self::Unknown(other) => other,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoInputFlags {
    pub enable_format_detection: bool,
}

impl VideoInputFlags {
    pub fn into_raw(self) -> ffi::BMDVideoInputFlags {
        let mut flags = 0;
        if self.enable_format_detection {
            flags |= ffi::BMD_VIDEO_INPUT_ENABLE_FORMAT_DETECTION;
        }
        flags
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoInputFormatChangedEvents {
    pub display_mode_changed: bool,
    pub field_dominance_changed: bool,
    pub colorspace_changed: bool,
}

impl From<ffi::BMDVideoInputFormatChangedEvents> for VideoInputFormatChangedEvents {
    fn from(value: ffi::BMDVideoInputFormatChangedEvents) -> Self {
        Self {
            display_mode_changed: value & ffi::BMD_VIDEO_INPUT_DISPLAY_MODE_CHANGED != 0,
            field_dominance_changed: value & ffi::BMD_VIDEO_INPUT_FIELD_DOMINANCE_CHANGED != 0,
            colorspace_changed: value & ffi::BMD_VIDEO_INPUT_COLORSPACE_CHANGED != 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectedVideoInputFormatFlags {
    pub format_y_cb_cr_422: bool,
    pub format_rgb_444: bool,
    pub dual_stream_3d: bool,
    pub bit_depth_12: bool,
    pub bit_depth_10: bool,
    pub bit_depth_8: bool,
}

impl From<ffi::BMDDetectedVideoInputFormatFlags> for DetectedVideoInputFormatFlags {
    fn from(value: ffi::BMDDetectedVideoInputFormatFlags) -> Self {
        Self {
            format_y_cb_cr_422: value & ffi::BMD_DETECTED_VIDEO_INPUT_YCBCR422 != 0,
            format_rgb_444: value & ffi::BMD_DETECTED_VIDEO_INPUT_RGB444 != 0,
            dual_stream_3d: value & ffi::BMD_DETECTED_VIDEO_INPUT_DUAL_STREAM_3D != 0,
            bit_depth_12: value & ffi::BMD_DETECTED_VIDEO_INPUT_12BIT_DEPTH != 0,
            bit_depth_10: value & ffi::BMD_DETECTED_VIDEO_INPUT_10BIT_DEPTH != 0,
            bit_depth_8: value & ffi::BMD_DETECTED_VIDEO_INPUT_8BIT_DEPTH != 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameFlags {
    pub flip_vertical: bool,
    pub captured_as_psf: bool,
    pub has_no_input_source: bool,
}

impl From<ffi::BMDFrameFlags> for FrameFlags {
    fn from(value: ffi::BMDFrameFlags) -> Self {
        Self {
            flip_vertical: value & ffi::BMD_FRAME_FLIP_VERTICAL != 0,
            captured_as_psf: value & ffi::BMD_FRAME_CAPTURED_AS_PSF != 0,
            has_no_input_source: value & ffi::BMD_FRAME_HAS_NO_INPUT_SOURCE != 0,
        }
    }
}
