//! Declarative model of the OBS configuration to generate
//!
//! Pure data: nothing here touches the filesystem. Every constructor that
//! produces a renderable value validates it first, so the renderer only ever
//! sees consistent models.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::ini::IniDocument;
use crate::constants::{defaults, source_ids};
use crate::error::{BootstrapError, BootstrapResult};

// ==============================================================================
// Identifiers and secrets
// ==============================================================================

/// Source of fresh unique ids for sources and scenes
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs, what OBS itself uses
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

impl<F: Fn() -> String> IdGenerator for F {
    fn next_id(&self) -> String {
        self()
    }
}

/// Opaque secret value
///
/// Written verbatim into exactly one rendered file; `Debug` and `Display`
/// never show it.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

// ==============================================================================
// Profile
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorFormat {
    #[serde(rename = "NV12")]
    Nv12,
    #[serde(rename = "I420")]
    I420,
    #[serde(rename = "I444")]
    I444,
    #[serde(rename = "P010")]
    P010,
    #[serde(rename = "RGB")]
    Rgb,
}

impl ColorFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorFormat::Nv12 => "NV12",
            ColorFormat::I420 => "I420",
            ColorFormat::I444 => "I444",
            ColorFormat::P010 => "P010",
            ColorFormat::Rgb => "RGB",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSpace {
    #[serde(rename = "sRGB")]
    Srgb,
    #[serde(rename = "601")]
    Rec601,
    #[serde(rename = "709")]
    Rec709,
}

impl ColorSpace {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorSpace::Srgb => "sRGB",
            ColorSpace::Rec601 => "601",
            ColorSpace::Rec709 => "709",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorRange {
    Partial,
    Full,
}

impl ColorRange {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorRange::Partial => "Partial",
            ColorRange::Full => "Full",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RateControl {
    Cbr,
    Vbr,
    Cqp,
}

impl RateControl {
    pub fn as_str(self) -> &'static str {
        match self {
            RateControl::Cbr => "CBR",
            RateControl::Vbr => "VBR",
            RateControl::Cqp => "CQP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    Simple,
    Advanced,
}

impl OutputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputMode::Simple => "Simple",
            OutputMode::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoSettings {
    pub base_width: u32,
    pub base_height: u32,
    pub output_width: u32,
    pub output_height: u32,
    pub frame_rate: u32,
    pub color_format: ColorFormat,
    pub color_space: ColorSpace,
    pub color_range: ColorRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub mode: OutputMode,
    pub audio_bitrate_kbps: u32,
    pub sample_rate: u32,
    /// Audio track used for the stream (1-6)
    pub track_index: u32,
    pub recording_path: Option<String>,
    pub recording_format: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncoderSettings {
    pub encoder_id: String,
    pub rate_control: RateControl,
    pub bitrate_kbps: u32,
    pub keyframe_interval_secs: u32,
    pub preset: String,
    pub profile: String,
    pub lookahead: bool,
    pub psycho_visual_tuning: bool,
    pub b_frames: u32,
}

/// Named bundle of video/output/encoder settings
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileConfig {
    pub name: String,
    pub video: VideoSettings,
    pub output: OutputSettings,
    pub encoder: EncoderSettings,
}

impl ProfileConfig {
    pub fn builder(name: impl Into<String>) -> ProfileBuilder {
        ProfileBuilder::new(name)
    }

    pub fn validate(&self) -> BootstrapResult<()> {
        validate_name("profile", &self.name)?;

        let v = &self.video;
        require_positive("video.base_width", v.base_width)?;
        require_positive("video.base_height", v.base_height)?;
        require_positive("video.output_width", v.output_width)?;
        require_positive("video.output_height", v.output_height)?;
        require_positive("video.frame_rate", v.frame_rate)?;

        let o = &self.output;
        require_positive("output.audio_bitrate_kbps", o.audio_bitrate_kbps)?;
        require_positive("output.sample_rate", o.sample_rate)?;
        if !(1..=6).contains(&o.track_index) {
            return Err(BootstrapError::validation(format!(
                "output.track_index must be between 1 and 6, got {}",
                o.track_index
            )));
        }

        require_ini_value("output.recording_format", &o.recording_format)?;
        if let Some(path) = &o.recording_path {
            require_ini_value("output.recording_path", path)?;
        }

        let e = &self.encoder;
        if e.encoder_id.trim().is_empty() {
            return Err(BootstrapError::validation("encoder.encoder_id must not be empty"));
        }
        require_ini_value("encoder.encoder_id", &e.encoder_id)?;
        require_ini_value("encoder.preset", &e.preset)?;
        require_ini_value("encoder.profile", &e.profile)?;
        require_positive("encoder.bitrate_kbps", e.bitrate_kbps)?;
        require_positive("encoder.keyframe_interval_secs", e.keyframe_interval_secs)?;
        Ok(())
    }
}

/// Builder with the defaults of a 1080p60 CBR stream
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    profile: ProfileConfig,
    output_size_set: bool,
}

impl ProfileBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            profile: ProfileConfig {
                name: name.into(),
                video: VideoSettings {
                    base_width: defaults::WIDTH,
                    base_height: defaults::HEIGHT,
                    output_width: defaults::WIDTH,
                    output_height: defaults::HEIGHT,
                    frame_rate: defaults::FRAME_RATE,
                    color_format: ColorFormat::Nv12,
                    color_space: ColorSpace::Rec709,
                    color_range: ColorRange::Partial,
                },
                output: OutputSettings {
                    mode: OutputMode::Advanced,
                    audio_bitrate_kbps: defaults::AUDIO_BITRATE_KBPS,
                    sample_rate: defaults::SAMPLE_RATE,
                    track_index: 1,
                    recording_path: None,
                    recording_format: "mkv".to_string(),
                },
                encoder: EncoderSettings {
                    encoder_id: defaults::ENCODER_ID.to_string(),
                    rate_control: RateControl::Cbr,
                    bitrate_kbps: defaults::BITRATE_KBPS,
                    keyframe_interval_secs: defaults::KEYFRAME_INTERVAL_SECS,
                    preset: defaults::PRESET.to_string(),
                    profile: defaults::PROFILE.to_string(),
                    lookahead: false,
                    psycho_visual_tuning: true,
                    b_frames: defaults::B_FRAMES,
                },
            },
            output_size_set: false,
        }
    }

    /// Canvas size; the output size follows unless set explicitly
    pub fn resolution(mut self, width: u32, height: u32) -> Self {
        self.profile.video.base_width = width;
        self.profile.video.base_height = height;
        if !self.output_size_set {
            self.profile.video.output_width = width;
            self.profile.video.output_height = height;
        }
        self
    }

    pub fn output_resolution(mut self, width: u32, height: u32) -> Self {
        self.profile.video.output_width = width;
        self.profile.video.output_height = height;
        self.output_size_set = true;
        self
    }

    pub fn frame_rate(mut self, fps: u32) -> Self {
        self.profile.video.frame_rate = fps;
        self
    }

    pub fn color(mut self, format: ColorFormat, space: ColorSpace, range: ColorRange) -> Self {
        self.profile.video.color_format = format;
        self.profile.video.color_space = space;
        self.profile.video.color_range = range;
        self
    }

    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.profile.output.mode = mode;
        self
    }

    pub fn audio(mut self, bitrate_kbps: u32, sample_rate: u32) -> Self {
        self.profile.output.audio_bitrate_kbps = bitrate_kbps;
        self.profile.output.sample_rate = sample_rate;
        self
    }

    pub fn recording_path(mut self, path: Option<String>) -> Self {
        self.profile.output.recording_path = path;
        self
    }

    pub fn encoder(mut self, encoder_id: impl Into<String>) -> Self {
        self.profile.encoder.encoder_id = encoder_id.into();
        self
    }

    pub fn rate_control(mut self, rate_control: RateControl, bitrate_kbps: u32) -> Self {
        self.profile.encoder.rate_control = rate_control;
        self.profile.encoder.bitrate_kbps = bitrate_kbps;
        self
    }

    pub fn keyframe_interval(mut self, secs: u32) -> Self {
        self.profile.encoder.keyframe_interval_secs = secs;
        self
    }

    pub fn preset(mut self, preset: impl Into<String>, profile: impl Into<String>) -> Self {
        self.profile.encoder.preset = preset.into();
        self.profile.encoder.profile = profile.into();
        self
    }

    pub fn tuning(mut self, lookahead: bool, psycho_visual_tuning: bool, b_frames: u32) -> Self {
        self.profile.encoder.lookahead = lookahead;
        self.profile.encoder.psycho_visual_tuning = psycho_visual_tuning;
        self.profile.encoder.b_frames = b_frames;
        self
    }

    pub fn build(self) -> BootstrapResult<ProfileConfig> {
        self.profile.validate()?;
        Ok(self.profile)
    }
}

// ==============================================================================
// Stream service
// ==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct StreamService {
    pub service_name: String,
    /// "auto" or an explicit ingest URL
    pub server: String,
    pub stream_key: Secret,
}

impl StreamService {
    pub fn new(service_name: impl Into<String>, server: impl Into<String>, stream_key: Secret) -> BootstrapResult<Self> {
        let service = Self {
            service_name: service_name.into(),
            server: server.into(),
            stream_key,
        };
        service.validate()?;
        Ok(service)
    }

    /// A service named "Custom" is a raw RTMP endpoint rather than a listed service
    pub fn is_custom(&self) -> bool {
        self.service_name.eq_ignore_ascii_case("custom")
    }

    pub fn validate(&self) -> BootstrapResult<()> {
        if self.service_name.trim().is_empty() {
            return Err(BootstrapError::validation("service name must not be empty"));
        }
        require_ini_value("service name", &self.service_name)?;
        if self.server.trim().is_empty() {
            return Err(BootstrapError::validation("service server must not be empty"));
        }
        require_ini_value("service server", &self.server)?;
        if self.is_custom() && self.server.eq_ignore_ascii_case(defaults::SERVER) {
            return Err(BootstrapError::validation(
                "a custom service needs an explicit server URL",
            ));
        }
        if self.stream_key.is_empty() {
            return Err(BootstrapError::validation("stream key must not be empty"));
        }
        Ok(())
    }
}

// ==============================================================================
// Scene collection
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    GameCapture,
    AudioOutputCapture,
    AudioInputCapture,
}

impl SourceKind {
    /// OBS source type id
    pub fn obs_id(self) -> &'static str {
        match self {
            SourceKind::GameCapture => source_ids::GAME_CAPTURE,
            SourceKind::AudioOutputCapture => source_ids::AUDIO_OUTPUT_CAPTURE,
            SourceKind::AudioInputCapture => source_ids::AUDIO_INPUT_CAPTURE,
        }
    }

    pub fn default_settings(self) -> Map<String, Value> {
        let mut settings = Map::new();
        match self {
            SourceKind::GameCapture => {
                settings.insert("capture_mode".to_string(), Value::from("any_fullscreen"));
                settings.insert("capture_cursor".to_string(), Value::from(false));
                settings.insert("allow_transparency".to_string(), Value::from(false));
            }
            SourceKind::AudioOutputCapture | SourceKind::AudioInputCapture => {
                settings.insert("device_id".to_string(), Value::from(defaults::AUDIO_DEVICE));
            }
        }
        settings
    }
}

/// A capturable input, owned by the collection's flat source list
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub id: String,
    pub kind: SourceKind,
    pub name: String,
    pub settings: Map<String, Value>,
    pub muted: bool,
    pub volume: f64,
}

impl Source {
    pub fn new(id: impl Into<String>, kind: SourceKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            settings: kind.default_settings(),
            muted: false,
            volume: 1.0,
        }
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// How an item is fitted into its bounding box (OBS `obs_bounds_type`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsKind {
    #[default]
    None,
    Stretch,
    ScaleInner,
    ScaleOuter,
}

impl BoundsKind {
    pub fn obs_value(self) -> u32 {
        match self {
            BoundsKind::None => 0,
            BoundsKind::Stretch => 1,
            BoundsKind::ScaleInner => 2,
            BoundsKind::ScaleOuter => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Crop {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub scale: Vec2,
    pub bounds_kind: BoundsKind,
    pub bounds: Vec2,
    pub crop: Crop,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::default(),
            scale: Vec2::new(1.0, 1.0),
            bounds_kind: BoundsKind::None,
            bounds: Vec2::default(),
            crop: Crop::default(),
        }
    }
}

/// Placement of a source inside a scene; refers to the source by id only
#[derive(Debug, Clone, PartialEq)]
pub struct SceneItem {
    pub source_id: String,
    pub transform: Transform,
    pub visible: bool,
    pub locked: bool,
}

impl SceneItem {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            transform: Transform::default(),
            visible: true,
            locked: false,
        }
    }

    /// Fit the item into the canvas keeping its aspect ratio
    pub fn fill_canvas(mut self, width: u32, height: u32) -> Self {
        self.transform.bounds_kind = BoundsKind::ScaleInner;
        self.transform.bounds = Vec2::new(f64::from(width), f64::from(height));
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: String,
    pub name: String,
    pub items: Vec<SceneItem>,
}

/// Named bundle of scenes and the sources they place
#[derive(Debug, Clone, PartialEq)]
pub struct SceneCollection {
    pub name: String,
    pub scenes: Vec<Scene>,
    pub sources: Vec<Source>,
    pub current_scene: String,
}

impl SceneCollection {
    pub fn builder<'a>(name: impl Into<String>, ids: &'a dyn IdGenerator) -> SceneCollectionBuilder<'a> {
        SceneCollectionBuilder {
            name: name.into(),
            ids,
            scenes: Vec::new(),
            sources: Vec::new(),
            current_scene: None,
        }
    }

    pub fn source(&self, id: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.id == id)
    }

    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.name == name)
    }

    pub fn validate(&self) -> BootstrapResult<()> {
        validate_name("scene collection", &self.name)?;

        if self.scenes.is_empty() {
            return Err(BootstrapError::validation(format!(
                "scene collection '{}' has no scenes",
                self.name
            )));
        }

        let mut scene_names = HashSet::new();
        for scene in &self.scenes {
            if scene.name.trim().is_empty() {
                return Err(BootstrapError::validation("scene name must not be empty"));
            }
            if !scene_names.insert(scene.name.as_str()) {
                return Err(BootstrapError::validation(format!(
                    "duplicate scene name '{}'",
                    scene.name
                )));
            }
        }

        // OBS looks sources and scenes up by name, so names share one namespace
        let mut source_ids = HashSet::new();
        let mut source_names = HashSet::new();
        for source in &self.sources {
            if source.id.is_empty() {
                return Err(BootstrapError::validation(format!(
                    "source '{}' has an empty id",
                    source.name
                )));
            }
            if !source_ids.insert(source.id.as_str()) {
                return Err(BootstrapError::validation(format!(
                    "duplicate source id '{}'",
                    source.id
                )));
            }
            if source.name.trim().is_empty() {
                return Err(BootstrapError::validation("source name must not be empty"));
            }
            if !source_names.insert(source.name.as_str()) || scene_names.contains(source.name.as_str()) {
                return Err(BootstrapError::validation(format!(
                    "source name '{}' is already used",
                    source.name
                )));
            }
            if !source.volume.is_finite() || !(0.0..=1.0).contains(&source.volume) {
                return Err(BootstrapError::validation(format!(
                    "source '{}' volume must be within [0, 1], got {}",
                    source.name, source.volume
                )));
            }
        }

        if self.scene(&self.current_scene).is_none() {
            return Err(BootstrapError::validation(format!(
                "current scene '{}' is not part of collection '{}'",
                self.current_scene, self.name
            )));
        }

        for scene in &self.scenes {
            for item in &scene.items {
                if !source_ids.contains(item.source_id.as_str()) {
                    return Err(BootstrapError::validation(format!(
                        "scene '{}' references unknown source id '{}'",
                        scene.name, item.source_id
                    )));
                }
            }
        }
        Ok(())
    }
}

pub struct SceneCollectionBuilder<'a> {
    name: String,
    ids: &'a dyn IdGenerator,
    scenes: Vec<Scene>,
    sources: Vec<Source>,
    current_scene: Option<String>,
}

impl SceneCollectionBuilder<'_> {
    pub fn next_id(&self) -> String {
        self.ids.next_id()
    }

    /// Add a source with the kind's default settings, returning its id
    pub fn add_source(&mut self, kind: SourceKind, name: impl Into<String>) -> String {
        let id = self.ids.next_id();
        self.sources.push(Source::new(id.clone(), kind, name));
        id
    }

    pub fn push_source(&mut self, source: Source) {
        self.sources.push(source);
    }

    pub fn add_scene(&mut self, name: impl Into<String>, items: Vec<SceneItem>) {
        self.scenes.push(Scene {
            id: self.ids.next_id(),
            name: name.into(),
            items,
        });
    }

    /// Defaults to the first scene when never called
    pub fn current_scene(&mut self, name: impl Into<String>) {
        self.current_scene = Some(name.into());
    }

    pub fn build(self) -> BootstrapResult<SceneCollection> {
        let current_scene = match self.current_scene {
            Some(name) => name,
            None => self.scenes.first().map(|s| s.name.clone()).unwrap_or_default(),
        };
        let collection = SceneCollection {
            name: self.name,
            scenes: self.scenes,
            sources: self.sources,
            current_scene,
        };
        collection.validate()?;
        Ok(collection)
    }
}

// ==============================================================================
// Global settings
// ==============================================================================

/// Which profile and collection OBS opens with
///
/// `base` carries the previous `global.ini` so unrelated settings survive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalSettings {
    pub profile: String,
    pub scene_collection: String,
    pub base: IniDocument,
}

impl GlobalSettings {
    pub fn new(profile: impl Into<String>, scene_collection: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            scene_collection: scene_collection.into(),
            base: IniDocument::default(),
        }
    }

    pub fn over(mut self, existing: IniDocument) -> Self {
        self.base = existing;
        self
    }
}

// ==============================================================================
// Full setup model
// ==============================================================================

/// Everything the setup flow renders in one go
#[derive(Debug, Clone, PartialEq)]
pub struct SetupModel {
    pub profile: ProfileConfig,
    pub service: StreamService,
    pub collection: SceneCollection,
    pub global: GlobalSettings,
}

impl SetupModel {
    /// Build the standard streaming setup: one scene with game capture,
    /// desktop audio and microphone, each switchable in the parameters
    pub fn standard(params: &SetupParams, ids: &dyn IdGenerator, stream_key: Secret) -> BootstrapResult<Self> {
        let p = &params.profile;
        let mut profile = ProfileConfig::builder(p.name.clone())
            .resolution(p.base_width, p.base_height)
            .frame_rate(p.frame_rate)
            .color(p.color_format, p.color_space, p.color_range)
            .output_mode(p.output_mode)
            .audio(p.audio_bitrate_kbps, p.sample_rate)
            .recording_path(p.recording_path.clone())
            .encoder(p.encoder_id.clone())
            .rate_control(p.rate_control, p.bitrate_kbps)
            .keyframe_interval(p.keyframe_interval_secs)
            .preset(p.preset.clone(), p.encoder_profile.clone())
            .tuning(p.lookahead, p.psycho_visual_tuning, p.b_frames);
        if let (Some(w), Some(h)) = (p.output_width, p.output_height) {
            profile = profile.output_resolution(w, h);
        }
        let profile = profile.build()?;

        let service = StreamService::new(
            params.service.name.clone(),
            params.service.server.clone(),
            stream_key,
        )?;

        let c = &params.collection;
        let mut builder = SceneCollection::builder(c.name.clone(), ids);
        let mut items = Vec::new();
        if c.game_capture {
            let id = builder.add_source(SourceKind::GameCapture, "Game Capture");
            items.push(
                SceneItem::new(id)
                    .fill_canvas(profile.video.base_width, profile.video.base_height)
                    .locked(c.lock_items),
            );
        }
        if c.desktop_audio {
            let source = Source::new(builder.next_id(), SourceKind::AudioOutputCapture, "Desktop Audio")
                .with_setting("device_id", c.desktop_device.clone())
                .with_volume(c.desktop_volume);
            items.push(SceneItem::new(source.id.clone()).locked(c.lock_items));
            builder.push_source(source);
        }
        if c.microphone {
            let source = Source::new(builder.next_id(), SourceKind::AudioInputCapture, "Mic/Aux")
                .with_setting("device_id", c.mic_device.clone())
                .with_volume(c.mic_volume)
                .with_muted(c.mic_muted);
            items.push(SceneItem::new(source.id.clone()).locked(c.lock_items));
            builder.push_source(source);
        }
        builder.add_scene(c.scene.clone(), items);
        builder.current_scene(c.scene.clone());
        let collection = builder.build()?;

        let global = GlobalSettings::new(profile.name.clone(), collection.name.clone());

        Ok(Self {
            profile,
            service,
            collection,
            global,
        })
    }

    pub fn validate(&self) -> BootstrapResult<()> {
        self.profile.validate()?;
        self.service.validate()?;
        self.collection.validate()?;
        validate_name("profile", &self.global.profile)?;
        validate_name("scene collection", &self.global.scene_collection)
    }
}

// ==============================================================================
// High-level parameters (deserialized from the tool settings)
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SetupParams {
    #[serde(default)]
    pub profile: ProfileParams,
    #[serde(default)]
    pub service: ServiceParams,
    #[serde(default)]
    pub collection: CollectionParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileParams {
    pub name: String,
    pub base_width: u32,
    pub base_height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_height: Option<u32>,
    pub frame_rate: u32,
    pub color_format: ColorFormat,
    pub color_space: ColorSpace,
    pub color_range: ColorRange,
    pub output_mode: OutputMode,
    pub encoder_id: String,
    pub rate_control: RateControl,
    pub bitrate_kbps: u32,
    pub keyframe_interval_secs: u32,
    pub preset: String,
    pub encoder_profile: String,
    pub lookahead: bool,
    pub psycho_visual_tuning: bool,
    pub b_frames: u32,
    pub audio_bitrate_kbps: u32,
    pub sample_rate: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_path: Option<String>,
}

impl Default for ProfileParams {
    fn default() -> Self {
        Self {
            name: defaults::PROFILE_NAME.to_string(),
            base_width: defaults::WIDTH,
            base_height: defaults::HEIGHT,
            output_width: None,
            output_height: None,
            frame_rate: defaults::FRAME_RATE,
            color_format: ColorFormat::Nv12,
            color_space: ColorSpace::Rec709,
            color_range: ColorRange::Partial,
            output_mode: OutputMode::Advanced,
            encoder_id: defaults::ENCODER_ID.to_string(),
            rate_control: RateControl::Cbr,
            bitrate_kbps: defaults::BITRATE_KBPS,
            keyframe_interval_secs: defaults::KEYFRAME_INTERVAL_SECS,
            preset: defaults::PRESET.to_string(),
            encoder_profile: defaults::PROFILE.to_string(),
            lookahead: false,
            psycho_visual_tuning: true,
            b_frames: defaults::B_FRAMES,
            audio_bitrate_kbps: defaults::AUDIO_BITRATE_KBPS,
            sample_rate: defaults::SAMPLE_RATE,
            recording_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceParams {
    pub name: String,
    pub server: String,
}

impl Default for ServiceParams {
    fn default() -> Self {
        Self {
            name: defaults::SERVICE_NAME.to_string(),
            server: defaults::SERVER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionParams {
    pub name: String,
    pub scene: String,
    pub game_capture: bool,
    pub desktop_audio: bool,
    pub microphone: bool,
    pub desktop_device: String,
    pub mic_device: String,
    pub desktop_volume: f64,
    pub mic_volume: f64,
    /// Microphone starts muted
    pub mic_muted: bool,
    /// Lock scene items against accidental drags in the OBS preview
    pub lock_items: bool,
}

impl Default for CollectionParams {
    fn default() -> Self {
        Self {
            name: defaults::COLLECTION_NAME.to_string(),
            scene: defaults::SCENE_NAME.to_string(),
            game_capture: true,
            desktop_audio: true,
            microphone: true,
            desktop_device: defaults::AUDIO_DEVICE.to_string(),
            mic_device: defaults::AUDIO_DEVICE.to_string(),
            desktop_volume: 1.0,
            mic_volume: 1.0,
            mic_muted: false,
            lock_items: false,
        }
    }
}

// ==============================================================================
// Validation helpers
// ==============================================================================

fn require_positive(field: &str, value: u32) -> BootstrapResult<()> {
    if value == 0 {
        return Err(BootstrapError::validation(format!("{field} must be greater than 0")));
    }
    Ok(())
}

/// Names become path components, so they must be valid file names everywhere
pub fn validate_name(what: &str, name: &str) -> BootstrapResult<()> {
    const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

    if name.trim().is_empty() {
        return Err(BootstrapError::validation(format!("{what} name must not be empty")));
    }
    if name == "." || name == ".." {
        return Err(BootstrapError::validation(format!("{what} name '{name}' is reserved")));
    }
    if name.chars().any(|c| c.is_control() || FORBIDDEN.contains(&c)) {
        return Err(BootstrapError::validation(format!(
            "{what} name '{name}' contains characters not allowed in file names"
        )));
    }
    if name.trim() != name {
        return Err(BootstrapError::validation(format!(
            "{what} name '{name}' must not start or end with whitespace"
        )));
    }
    if name.ends_with('.') {
        return Err(BootstrapError::validation(format!(
            "{what} name '{name}' must not end with a dot"
        )));
    }
    Ok(())
}

/// Text written as an INI value has to read back unchanged: the parser
/// splits on line breaks and trims around values
fn require_ini_value(field: &str, value: &str) -> BootstrapResult<()> {
    if value.chars().any(char::is_control) {
        return Err(BootstrapError::validation(format!(
            "{field} must not contain line breaks or control characters"
        )));
    }
    if value.trim() != value {
        return Err(BootstrapError::validation(format!(
            "{field} must not start or end with whitespace"
        )));
    }
    Ok(())
}
