//! Application-wide constants
//!
//! File names, section names and default install locations used throughout
//! the application, kept in one place.

/// Layout of the OBS settings tree (relative to the settings root)
pub mod layout {
    /// Directory under the platform config dir holding OBS settings
    pub const OBS_DIR: &str = "obs-studio";

    pub const BASIC_DIR: &str = "basic";
    pub const PROFILES_DIR: &str = "profiles";
    pub const SCENES_DIR: &str = "scenes";

    pub const PROFILE_INI: &str = "basic.ini";
    pub const STREAM_ENCODER_JSON: &str = "streamEncoder.json";
    pub const SERVICE_JSON: &str = "service.json";
    pub const GLOBAL_INI: &str = "global.ini";
}

/// Section names of the profile `basic.ini`
pub mod sections {
    pub const GENERAL: &str = "General";
    pub const VIDEO: &str = "Video";
    pub const AUDIO: &str = "Audio";
    pub const OUTPUT: &str = "Output";
    pub const ADV_OUT: &str = "AdvOut";
    pub const SIMPLE_OUTPUT: &str = "SimpleOutput";
    pub const STREAM: &str = "Stream";
    pub const HOTKEYS: &str = "Hotkeys";

    /// Fixed emission order; some consumers read sections positionally
    pub const PROFILE_ORDER: [&str; 8] = [
        GENERAL,
        VIDEO,
        AUDIO,
        OUTPUT,
        ADV_OUT,
        SIMPLE_OUTPUT,
        STREAM,
        HOTKEYS,
    ];

    /// Section of `global.ini` that points OBS at the active profile/collection
    pub const GLOBAL_BASIC: &str = "Basic";
}

/// OBS source type identifiers
pub mod source_ids {
    pub const GAME_CAPTURE: &str = "game_capture";
    pub const AUDIO_OUTPUT_CAPTURE: &str = "wasapi_output_capture";
    pub const AUDIO_INPUT_CAPTURE: &str = "wasapi_input_capture";
    pub const SCENE: &str = "scene";

    /// Mixer bitmask routing a source to all six audio tracks
    pub const ALL_MIXERS: u32 = 0b11_1111;
}

/// OBS process and install locations
pub mod obs {
    /// Name as it appears in the process table (matched case-insensitively)
    #[cfg(target_os = "windows")]
    pub const PROCESS_NAME: &str = "obs64";
    #[cfg(not(target_os = "windows"))]
    pub const PROCESS_NAME: &str = "obs";

    pub const DISPLAY_NAME: &str = "OBS Studio";

    pub const CANDIDATE_PATHS: [&str; 4] = [
        r"C:\Program Files\obs-studio\bin\64bit\obs64.exe",
        r"C:\Program Files (x86)\obs-studio\bin\64bit\obs64.exe",
        "/usr/bin/obs",
        "/Applications/OBS.app/Contents/MacOS/OBS",
    ];

    /// Seconds to wait after launch before relying on OBS being up
    pub const SETTLE_DELAY_SECS: u64 = 5;

    /// Stream service descriptor type for services from the built-in list
    pub const SERVICE_TYPE_COMMON: &str = "rtmp_common";

    /// Stream service descriptor type for a custom RTMP server
    pub const SERVICE_TYPE_CUSTOM: &str = "rtmp_custom";
}

/// Defaults for generated profiles
pub mod defaults {
    pub const PROFILE_NAME: &str = "Streaming";
    pub const COLLECTION_NAME: &str = "Streaming";
    pub const SCENE_NAME: &str = "Main";

    pub const WIDTH: u32 = 1920;
    pub const HEIGHT: u32 = 1080;
    pub const FRAME_RATE: u32 = 60;

    pub const ENCODER_ID: &str = "jim_nvenc";
    pub const BITRATE_KBPS: u32 = 6000;
    pub const KEYFRAME_INTERVAL_SECS: u32 = 2;
    pub const PRESET: &str = "p5";
    pub const PROFILE: &str = "high";
    pub const B_FRAMES: u32 = 2;

    pub const AUDIO_BITRATE_KBPS: u32 = 160;
    pub const SAMPLE_RATE: u32 = 48_000;

    pub const SERVICE_NAME: &str = "Twitch";
    pub const SERVER: &str = "auto";

    /// Device id OBS uses for the system default audio endpoint
    pub const AUDIO_DEVICE: &str = "default";
}

/// Tool configuration file location and environment overrides
pub mod config {
    pub const APP_DIR: &str = "obs-bootstrap";
    pub const FILENAME: &str = "settings.json";

    pub const ENV_PROFILE: &str = "OBS_BOOTSTRAP_PROFILE";
    pub const ENV_COLLECTION: &str = "OBS_BOOTSTRAP_COLLECTION";
    pub const ENV_STREAM_KEY_FILE: &str = "OBS_BOOTSTRAP_STREAM_KEY_FILE";

    /// Credential key for the stream key
    pub const STREAM_KEY: &str = "stream_key";
}
