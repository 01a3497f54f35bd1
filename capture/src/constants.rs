//! Constants shared by the device negotiation and session code.

/// Minimum resolution a media type must reach to be picked for previews.
pub mod selection {
    /// Width floor of the selection policy
    pub const FLOOR_WIDTH: u32 = 640;
    /// Height floor of the selection policy
    pub const FLOOR_HEIGHT: u32 = 480;
    /// Frames thrown away while auto-exposure settles before the preview shot
    pub const WARMUP_FRAMES: usize = 5;
}

/// Bounds for resolution hints passed to live sessions.
pub mod limits {
    pub const MIN_DIMENSION: u32 = 1;
    /// 8K width
    pub const MAX_DIMENSION: u32 = 7680;
}

/// Logging intervals for frame processing
pub mod logging {
    /// Log progress every N frames pulled by a session
    pub const FRAME_LOG_INTERVAL: u64 = 1000;
}
