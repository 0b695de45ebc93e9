//! Turns a [`SetupModel`] into the files OBS reads
//!
//! Pure: returns `(relative path, content, format)` triples and leaves the
//! filesystem to the writer. JSON fields are emitted in declaration order,
//! floats stay floats (`1.0`, never `1`).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ini::{IniDocument, IniSection};
use crate::config::model::{
    GlobalSettings, ProfileConfig, SceneCollection, Source, SetupModel, StreamService, Vec2,
};
use crate::constants::{layout, obs, sections, source_ids};
use crate::error::{BootstrapError, BootstrapResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Ini,
    Json,
}

/// One file to materialize, relative to the OBS settings root
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub content: String,
    pub format: FileFormat,
}

// Content may hold the stream key; never print it
impl fmt::Debug for RenderedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedFile")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("bytes", &self.content.len())
            .finish()
    }
}

pub fn profile_dir(profile: &str) -> PathBuf {
    Path::new(layout::BASIC_DIR)
        .join(layout::PROFILES_DIR)
        .join(profile)
}

pub fn scene_collection_path(collection: &str) -> PathBuf {
    Path::new(layout::BASIC_DIR)
        .join(layout::SCENES_DIR)
        .join(format!("{collection}.json"))
}

pub fn global_ini_path() -> PathBuf {
    PathBuf::from(layout::GLOBAL_INI)
}

/// Render every file of the model, validating it first
pub fn render(model: &SetupModel) -> BootstrapResult<Vec<RenderedFile>> {
    model.validate()?;

    let dir = profile_dir(&model.profile.name);
    let files = vec![
        RenderedFile {
            path: dir.join(layout::PROFILE_INI),
            content: render_profile_ini(&model.profile, &model.service).render(),
            format: FileFormat::Ini,
        },
        RenderedFile {
            path: dir.join(layout::STREAM_ENCODER_JSON),
            content: render_stream_encoder(&model.profile)?,
            format: FileFormat::Json,
        },
        RenderedFile {
            path: dir.join(layout::SERVICE_JSON),
            content: render_service(&model.service)?,
            format: FileFormat::Json,
        },
        RenderedFile {
            path: scene_collection_path(&model.collection.name),
            content: render_scene_collection(&model.collection)?,
            format: FileFormat::Json,
        },
        RenderedFile {
            path: global_ini_path(),
            content: render_global_ini(&model.global).render(),
            format: FileFormat::Ini,
        },
    ];

    for file in &files {
        debug!(path = %file.path.display(), format = ?file.format, bytes = file.content.len(), "Rendered file");
    }
    Ok(files)
}

// ==============================================================================
// Key-grouped text (basic.ini, global.ini)
// ==============================================================================

pub fn render_profile_ini(profile: &ProfileConfig, service: &StreamService) -> IniDocument {
    let mut doc = IniDocument::new();
    for name in sections::PROFILE_ORDER {
        let section = doc.section_mut(name);
        match name {
            sections::GENERAL => general_section(section, profile),
            sections::VIDEO => video_section(section, profile),
            sections::AUDIO => audio_section(section, profile),
            sections::OUTPUT => section.set("Mode", profile.output.mode.as_str()),
            sections::ADV_OUT => adv_out_section(section, profile),
            sections::SIMPLE_OUTPUT => simple_output_section(section, profile),
            sections::STREAM => stream_section(section, service),
            // Left to OBS defaults
            _ => {}
        }
    }
    doc
}

fn general_section(section: &mut IniSection, profile: &ProfileConfig) {
    section.set("Name", &profile.name);
}

fn video_section(section: &mut IniSection, profile: &ProfileConfig) {
    let v = &profile.video;
    section.set("BaseCX", v.base_width);
    section.set("BaseCY", v.base_height);
    section.set("OutputCX", v.output_width);
    section.set("OutputCY", v.output_height);
    // FPSType 0 picks from OBS's list of common rates, 1 takes any integer
    match common_fps(v.frame_rate) {
        Some(common) => {
            section.set("FPSType", 0);
            section.set("FPSCommon", common);
        }
        None => {
            section.set("FPSType", 1);
            section.set("FPSInt", v.frame_rate);
        }
    }
    section.set("ColorFormat", v.color_format.as_str());
    section.set("ColorSpace", v.color_space.as_str());
    section.set("ColorRange", v.color_range.as_str());
    section.set("ScaleType", "bicubic");
}

fn audio_section(section: &mut IniSection, profile: &ProfileConfig) {
    section.set("SampleRate", profile.output.sample_rate);
    section.set("ChannelSetup", "Stereo");
}

fn adv_out_section(section: &mut IniSection, profile: &ProfileConfig) {
    let o = &profile.output;
    section.set("Encoder", &profile.encoder.encoder_id);
    section.set("TrackIndex", o.track_index);
    section.set("RecType", "Standard");
    section.set("RecEncoder", "none");
    section.set("RecFormat2", &o.recording_format);
    if let Some(path) = &o.recording_path {
        section.set("RecFilePath", path);
    }
    section.set(format!("Track{}Bitrate", o.track_index), o.audio_bitrate_kbps);
}

fn simple_output_section(section: &mut IniSection, profile: &ProfileConfig) {
    let o = &profile.output;
    if let Some(encoder) = simple_encoder_name(&profile.encoder.encoder_id) {
        section.set("StreamEncoder", encoder);
    }
    section.set("VBitrate", profile.encoder.bitrate_kbps);
    section.set("ABitrate", o.audio_bitrate_kbps);
    section.set("RecFormat2", &o.recording_format);
    if let Some(path) = &o.recording_path {
        section.set("FilePath", path);
    }
}

/// Entry in OBS's common frame rate list, spelled the way OBS stores it
fn common_fps(fps: u32) -> Option<&'static str> {
    match fps {
        10 => Some("10"),
        20 => Some("20"),
        25 => Some("25 PAL"),
        30 => Some("30"),
        48 => Some("48"),
        50 => Some("50 PAL"),
        60 => Some("60"),
        _ => None,
    }
}

/// Simple output mode names encoders differently from advanced mode
fn simple_encoder_name(encoder_id: &str) -> Option<&'static str> {
    match encoder_id {
        "jim_nvenc" | "obs_nvenc_h264_tex" => Some("nvenc"),
        "obs_x264" => Some("x264"),
        "h264_texture_amf" => Some("amd"),
        "obs_qsv11_v2" | "obs_qsv11" => Some("qsv"),
        _ => None,
    }
}

/// Descriptor only; the key itself lives in service.json
fn stream_section(section: &mut IniSection, service: &StreamService) {
    section.set("Service", &service.service_name);
    section.set("Type", service_type(service));
}

fn service_type(service: &StreamService) -> &'static str {
    if service.is_custom() {
        obs::SERVICE_TYPE_CUSTOM
    } else {
        obs::SERVICE_TYPE_COMMON
    }
}

pub fn render_global_ini(global: &GlobalSettings) -> IniDocument {
    let mut doc = global.base.clone();
    let basic = doc.section_mut(sections::GLOBAL_BASIC);
    basic.set("Profile", &global.profile);
    basic.set("ProfileDir", &global.profile);
    basic.set("SceneCollection", &global.scene_collection);
    basic.set("SceneCollectionFile", &global.scene_collection);
    doc
}

// ==============================================================================
// Nested structured (streamEncoder.json, service.json, scenes/<name>.json)
// ==============================================================================

fn to_json<T: Serialize>(value: &T) -> BootstrapResult<String> {
    let mut text = serde_json::to_string_pretty(value).map_err(|e| BootstrapError::Other(e.into()))?;
    text.push('\n');
    Ok(text)
}

#[derive(Serialize)]
struct EncoderJson<'a> {
    rate_control: &'a str,
    bitrate: u32,
    keyint_sec: u32,
    preset2: &'a str,
    profile: &'a str,
    lookahead: bool,
    psycho_aq: bool,
    bf: u32,
}

pub fn render_stream_encoder(profile: &ProfileConfig) -> BootstrapResult<String> {
    let e = &profile.encoder;
    to_json(&EncoderJson {
        rate_control: e.rate_control.as_str(),
        bitrate: e.bitrate_kbps,
        keyint_sec: e.keyframe_interval_secs,
        preset2: &e.preset,
        profile: &e.profile,
        lookahead: e.lookahead,
        psycho_aq: e.psycho_visual_tuning,
        bf: e.b_frames,
    })
}

#[derive(Serialize)]
struct ServiceJson<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    settings: ServiceSettingsJson<'a>,
}

#[derive(Serialize)]
struct ServiceSettingsJson<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<&'a str>,
    server: &'a str,
    key: &'a str,
    bwtest: bool,
}

pub fn render_service(service: &StreamService) -> BootstrapResult<String> {
    to_json(&ServiceJson {
        kind: service_type(service),
        settings: ServiceSettingsJson {
            service: (!service.is_custom()).then_some(service.service_name.as_str()),
            server: &service.server,
            key: service.stream_key.expose(),
            bwtest: false,
        },
    })
}

#[derive(Serialize)]
struct CollectionJson<'a> {
    current_scene: &'a str,
    current_program_scene: &'a str,
    scene_order: Vec<NameJson<'a>>,
    name: &'a str,
    sources: Vec<SourceJson<'a>>,
}

#[derive(Serialize)]
struct NameJson<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct SourceJson<'a> {
    id: &'a str,
    versioned_id: &'a str,
    name: &'a str,
    uuid: &'a str,
    settings: Value,
    enabled: bool,
    muted: bool,
    volume: f64,
    mixers: u32,
    flags: u32,
}

#[derive(Serialize)]
struct SceneSettingsJson<'a> {
    id_counter: usize,
    custom_size: bool,
    items: Vec<SceneItemJson<'a>>,
}

#[derive(Serialize)]
struct SceneItemJson<'a> {
    name: &'a str,
    source_uuid: &'a str,
    visible: bool,
    locked: bool,
    rot: f64,
    pos: PointJson,
    scale: PointJson,
    align: u32,
    bounds_type: u32,
    bounds_align: u32,
    bounds: PointJson,
    crop_left: u32,
    crop_top: u32,
    crop_right: u32,
    crop_bottom: u32,
    id: usize,
}

#[derive(Serialize)]
struct PointJson {
    x: f64,
    y: f64,
}

impl From<Vec2> for PointJson {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// OBS alignment flags: top-left
const ALIGN_TOP_LEFT: u32 = 5;

pub fn render_scene_collection(collection: &SceneCollection) -> BootstrapResult<String> {
    collection.validate()?;

    let mut sources = Vec::with_capacity(collection.scenes.len() + collection.sources.len());
    for scene in &collection.scenes {
        let mut items = Vec::with_capacity(scene.items.len());
        for (index, item) in scene.items.iter().enumerate() {
            let source = lookup_source(collection, &item.source_id)?;
            let t = &item.transform;
            items.push(SceneItemJson {
                name: &source.name,
                source_uuid: &source.id,
                visible: item.visible,
                locked: item.locked,
                rot: 0.0,
                pos: t.position.into(),
                scale: t.scale.into(),
                align: ALIGN_TOP_LEFT,
                bounds_type: t.bounds_kind.obs_value(),
                bounds_align: 0,
                bounds: t.bounds.into(),
                crop_left: t.crop.left,
                crop_top: t.crop.top,
                crop_right: t.crop.right,
                crop_bottom: t.crop.bottom,
                id: index + 1,
            });
        }
        let settings = SceneSettingsJson {
            id_counter: scene.items.len(),
            custom_size: false,
            items,
        };
        sources.push(SourceJson {
            id: source_ids::SCENE,
            versioned_id: source_ids::SCENE,
            name: &scene.name,
            uuid: &scene.id,
            settings: serde_json::to_value(settings).map_err(|e| BootstrapError::Other(e.into()))?,
            enabled: true,
            muted: false,
            volume: 1.0,
            mixers: 0,
            flags: 0,
        });
    }

    for source in &collection.sources {
        sources.push(SourceJson {
            id: source.kind.obs_id(),
            versioned_id: source.kind.obs_id(),
            name: &source.name,
            uuid: &source.id,
            settings: Value::Object(source.settings.clone()),
            enabled: true,
            muted: source.muted,
            volume: source.volume,
            mixers: source_ids::ALL_MIXERS,
            flags: 0,
        });
    }

    to_json(&CollectionJson {
        current_scene: &collection.current_scene,
        current_program_scene: &collection.current_scene,
        scene_order: collection
            .scenes
            .iter()
            .map(|s| NameJson { name: &s.name })
            .collect(),
        name: &collection.name,
        sources,
    })
}

fn lookup_source<'a>(collection: &'a SceneCollection, id: &str) -> BootstrapResult<&'a Source> {
    collection
        .source(id)
        .ok_or_else(|| BootstrapError::validation(format!("unknown source id '{id}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::tests::{SequentialIds, standard_model};
    use crate::config::model::{
        ColorFormat, ColorRange, ColorSpace, RateControl, SceneItem, Secret, SetupParams, SourceKind,
    };

    fn file<'a>(files: &'a [RenderedFile], name: &str) -> &'a RenderedFile {
        files
            .iter()
            .find(|f| f.path.ends_with(name))
            .unwrap_or_else(|| panic!("no rendered file ending with {name}"))
    }

    fn json(file: &RenderedFile) -> Value {
        serde_json::from_str(&file.content).unwrap()
    }

    #[test]
    fn test_render_paths() {
        let files = render(&standard_model()).unwrap();
        let paths: Vec<PathBuf> = files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                Path::new("basic").join("profiles").join("Streaming").join("basic.ini"),
                Path::new("basic").join("profiles").join("Streaming").join("streamEncoder.json"),
                Path::new("basic").join("profiles").join("Streaming").join("service.json"),
                Path::new("basic").join("scenes").join("Streaming.json"),
                PathBuf::from("global.ini"),
            ]
        );
    }

    #[test]
    fn test_scenario_1080p60_cbr() {
        let files = render(&standard_model()).unwrap();

        let ini = IniDocument::parse(&file(&files, "basic.ini").content);
        assert_eq!(ini.get("Video", "BaseCX"), Some("1920"));
        assert_eq!(ini.get("Video", "BaseCY"), Some("1080"));
        assert_eq!(ini.get("Video", "FPSCommon"), Some("60"));

        let encoder = file(&files, "streamEncoder.json");
        assert!(encoder.content.contains("\"bitrate\": 6000"));
        assert_eq!(json(encoder)["rate_control"], "CBR");
    }

    #[test]
    fn test_profile_sections_in_fixed_order() {
        let model = standard_model();
        let ini = render_profile_ini(&model.profile, &model.service).render();
        let positions: Vec<usize> = ["[General]", "[Video]", "[Audio]", "[Output]", "[AdvOut]", "[SimpleOutput]", "[Stream]"]
            .iter()
            .map(|header| ini.find(header).unwrap_or_else(|| panic!("missing {header}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        // Hotkeys has no keys and is left out
        assert!(!ini.contains("[Hotkeys]"));
    }

    #[test]
    fn test_video_keys_follow_model_order() {
        let model = standard_model();
        let doc = render_profile_ini(&model.profile, &model.service);
        let keys: Vec<&str> = doc
            .section("Video")
            .unwrap()
            .entries
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(&keys[..4], &["BaseCX", "BaseCY", "OutputCX", "OutputCY"]);
    }

    #[test]
    fn test_uncommon_frame_rate_uses_integer_fps() {
        let mut model = standard_model();
        let video = |model: &SetupModel| {
            render_profile_ini(&model.profile, &model.service)
                .section("Video")
                .cloned()
                .unwrap()
        };

        let common = video(&model);
        assert_eq!(common.get("FPSType"), Some("0"));
        assert_eq!(common.get("FPSCommon"), Some("60"));
        assert_eq!(common.get("FPSInt"), None);

        model.profile.video.frame_rate = 144;
        let custom = video(&model);
        assert_eq!(custom.get("FPSType"), Some("1"));
        assert_eq!(custom.get("FPSInt"), Some("144"));
        assert_eq!(custom.get("FPSCommon"), None);

        model.profile.video.frame_rate = 25;
        assert_eq!(video(&model).get("FPSCommon"), Some("25 PAL"));
    }

    #[test]
    fn test_profile_ini_round_trip() {
        let params = SetupParams::default();
        let profile = ProfileConfig::builder("Night")
            .resolution(2560, 1440)
            .output_resolution(1920, 1080)
            .frame_rate(30)
            .color(ColorFormat::P010, ColorSpace::Srgb, ColorRange::Full)
            .recording_path(Some(r"D:\Recordings".to_string()))
            .build()
            .unwrap();
        let service = StreamService::new(params.service.name, params.service.server, Secret::new("k")).unwrap();

        let doc = IniDocument::parse(&render_profile_ini(&profile, &service).render());
        assert_eq!(doc.get("General", "Name"), Some("Night"));
        assert_eq!(doc.get("Video", "BaseCX"), Some("2560"));
        assert_eq!(doc.get("Video", "OutputCY"), Some("1080"));
        assert_eq!(doc.get("Video", "FPSCommon"), Some("30"));
        assert_eq!(doc.get("Video", "ColorFormat"), Some("P010"));
        assert_eq!(doc.get("Video", "ColorSpace"), Some("sRGB"));
        assert_eq!(doc.get("Video", "ColorRange"), Some("Full"));
        assert_eq!(doc.get("Output", "Mode"), Some("Advanced"));
        assert_eq!(doc.get("AdvOut", "Encoder"), Some("jim_nvenc"));
        assert_eq!(doc.get("AdvOut", "RecFilePath"), Some(r"D:\Recordings"));
        assert_eq!(doc.get("AdvOut", "Track1Bitrate"), Some("160"));
        assert_eq!(doc.get("SimpleOutput", "StreamEncoder"), Some("nvenc"));
        assert_eq!(doc.get("SimpleOutput", "VBitrate"), Some("6000"));
        assert_eq!(doc.get("Stream", "Service"), Some("Twitch"));
    }

    #[test]
    fn test_stream_encoder_field_order_and_types() {
        let profile = ProfileConfig::builder("P")
            .rate_control(RateControl::Vbr, 8000)
            .tuning(true, false, 0)
            .build()
            .unwrap();
        let text = render_stream_encoder(&profile).unwrap();

        let order = ["rate_control", "bitrate", "keyint_sec", "preset2", "profile", "lookahead", "psycho_aq", "bf"];
        let positions: Vec<usize> = order
            .iter()
            .map(|k| text.find(&format!("\"{k}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["rate_control"], "VBR");
        assert_eq!(value["bitrate"], 8000);
        assert_eq!(value["lookahead"], Value::Bool(true));
        assert_eq!(value["psycho_aq"], Value::Bool(false));
        assert_eq!(value["bf"], 0);
    }

    #[test]
    fn test_service_descriptor() {
        let service = StreamService::new("Twitch", "auto", Secret::new("live_abc123")).unwrap();
        let value: Value = serde_json::from_str(&render_service(&service).unwrap()).unwrap();
        assert_eq!(value["type"], "rtmp_common");
        assert_eq!(value["settings"]["service"], "Twitch");
        assert_eq!(value["settings"]["server"], "auto");
        assert_eq!(value["settings"]["key"], "live_abc123");
    }

    #[test]
    fn test_custom_service_descriptor() {
        let service = StreamService::new("Custom", "rtmp://ingest.example/live", Secret::new("k")).unwrap();
        let value: Value = serde_json::from_str(&render_service(&service).unwrap()).unwrap();
        assert_eq!(value["type"], "rtmp_custom");
        assert!(value["settings"].get("service").is_none());
        assert_eq!(value["settings"]["server"], "rtmp://ingest.example/live");
    }

    #[test]
    fn test_stream_key_only_in_service_file() {
        let files = render(&standard_model()).unwrap();
        let holders: Vec<&RenderedFile> = files
            .iter()
            .filter(|f| f.content.contains("live_abc123"))
            .collect();
        assert_eq!(holders.len(), 1);
        assert!(holders[0].path.ends_with("service.json"));
        assert!(!format!("{files:?}").contains("live_abc123"));
    }

    #[test]
    fn test_scene_collection_round_trip() {
        let model = standard_model();
        let files = render(&model).unwrap();
        let value = json(file(&files, "Streaming.json"));

        assert_eq!(value["name"], "Streaming");
        assert_eq!(value["current_scene"], "Main");
        assert_eq!(value["scene_order"], serde_json::json!([{ "name": "Main" }]));

        let sources = value["sources"].as_array().unwrap();
        assert_eq!(sources.len(), 4);
        assert_eq!(sources[0]["id"], "scene");
        assert_eq!(sources[0]["name"], "Main");

        let items = sources[0]["settings"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        for (item, source) in items.iter().zip(&model.collection.sources) {
            assert_eq!(item["source_uuid"], source.id.as_str());
            assert_eq!(item["name"], source.name.as_str());
        }
        assert_eq!(items[0]["bounds_type"], 2);
        assert_eq!(items[0]["bounds"]["x"].as_f64(), Some(1920.0));

        for (json_source, source) in sources[1..].iter().zip(&model.collection.sources) {
            assert_eq!(json_source["uuid"], source.id.as_str());
            assert_eq!(json_source["id"], source.kind.obs_id());
            assert_eq!(json_source["muted"], Value::Bool(source.muted));
            assert_eq!(json_source["volume"].as_f64(), Some(source.volume));
        }
        assert_eq!(sources[2]["settings"]["device_id"], "default");
    }

    #[test]
    fn test_floats_stay_floats() {
        let files = render(&standard_model()).unwrap();
        let content = &file(&files, "Streaming.json").content;
        assert!(content.contains("\"volume\": 1.0"));
        assert!(!content.contains("\"volume\": 1,"));
        assert!(content.contains("\"x\": 1.0"));
    }

    #[test]
    fn test_dangling_item_rejected_by_renderer() {
        let mut model = standard_model();
        let removed = model.collection.sources.remove(0);
        let err = render(&model).unwrap_err();
        assert!(matches!(err, BootstrapError::Validation(ref m) if m.contains(&removed.id)));
    }

    #[test]
    fn test_scene_collection_multiple_scenes() {
        let ids = SequentialIds::default();
        let mut builder = SceneCollection::builder("Two", &ids);
        let mic = builder.add_source(SourceKind::AudioInputCapture, "Mic");
        builder.add_scene("Starting", vec![SceneItem::new(mic.clone()).locked(true)]);
        builder.add_scene("Live", vec![SceneItem::new(mic)]);
        builder.current_scene("Live");
        let collection = builder.build().unwrap();

        let value: Value = serde_json::from_str(&render_scene_collection(&collection).unwrap()).unwrap();
        assert_eq!(value["current_scene"], "Live");
        assert_eq!(
            value["scene_order"],
            serde_json::json!([{ "name": "Starting" }, { "name": "Live" }])
        );
        assert_eq!(value["sources"][0]["settings"]["items"][0]["locked"], Value::Bool(true));
        assert_eq!(value["sources"][1]["uuid"], collection.scenes[1].id.as_str());
    }

    #[test]
    fn test_global_ini_keeps_unrelated_settings() {
        let existing = IniDocument::parse(
            "[General]\nLanguage=de-DE\n\n[Basic]\nProfile=Old\nSceneCollection=Old\nConfigOnNewProfile=true\n",
        );
        let global = GlobalSettings::new("Streaming", "Streaming").over(existing);
        let doc = render_global_ini(&global);

        assert_eq!(doc.get("General", "Language"), Some("de-DE"));
        assert_eq!(doc.get("Basic", "Profile"), Some("Streaming"));
        assert_eq!(doc.get("Basic", "ProfileDir"), Some("Streaming"));
        assert_eq!(doc.get("Basic", "SceneCollection"), Some("Streaming"));
        assert_eq!(doc.get("Basic", "SceneCollectionFile"), Some("Streaming"));
        assert_eq!(doc.get("Basic", "ConfigOnNewProfile"), Some("true"));
        assert_eq!(doc.sections[0].name, "General");
    }
}
