//! Build the instrument catalog from the engine's preset list.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use pipq_types::{Instrument, PresetInfo};

use crate::display_name::presets_with_display_names;
use crate::error::CoreError;
use crate::library::Library;
use crate::rpc::EngineGateway;

/// Backlight color pairs `(primary, secondary)` per instrument family.
pub fn category_colors(category: &str) -> (&'static str, &'static str) {
    match category {
        "electric-tines" => ("#af2523", "#1b1b1b"),
        "electric-keys" => ("#cc481c", "#ea673b"),
        "vibraphone" => ("#735534", "#a68454"),
        "percussion-mallet" => ("#a67247", "#bf814e"),
        "percussion-wood" => ("#732e1f", "#959998"),
        "percussion-metal" => ("#382d2b", "#6c2f1a"),
        "harpsichord" => ("#251310", "#4d281b"),
        "harp" => ("#743620", "#b95d36"),
        "historical" => ("#33150f", "#73422e"),
        _ => ("#040404", "#2e3234"),
    }
}

const KNOWN_INSTRUMENTS: &[(&str, &str)] = &[
    ("Grand C. Bechstein DG", "piano"),
    ("Grand Ant. Petrof", "piano"),
    ("Grand Steingraeber", "piano"),
    ("Grand Grotrian", "piano"),
    ("Grand Blüthner", "piano"),
    ("Grand YC5", "piano"),
    ("Grand K2", "piano"),
    ("Upright U4", "piano"),
    ("Vintage Tines MKI", "electric-tines"),
    ("Vintage Tines MKII", "electric-tines"),
    ("Vintage Reeds", "electric-tines"),
    ("Clavinet D6", "electric-keys"),
    ("Pianet N", "electric-keys"),
    ("Pianet T", "electric-keys"),
    ("Electra-Piano", "electric-keys"),
    ("Vibraphone V-B", "vibraphone"),
    ("Vibraphone V-M", "vibraphone"),
    ("Celesta", "percussion-mallet"),
    ("Glockenspiel", "percussion-mallet"),
    ("Toy Piano", "percussion-mallet"),
    ("Kalimba", "percussion-mallet"),
    ("Marimba", "percussion-wood"),
    ("Xylophone", "percussion-wood"),
    ("Steel Drum", "percussion-metal"),
    ("Spacedrum", "percussion-metal"),
    ("Hand Pan", "percussion-metal"),
    ("Tank Drum", "percussion-metal"),
    ("H. Ruckers II Harpsichord", "harpsichord"),
    ("Concert Harp", "harp"),
    ("J. Dohnal (1795)", "historical"),
    ("I. Besendorfer (1829)", "historical"),
    ("S. Erard (1849)", "historical"),
    ("J.B. Streicher (1852)", "historical"),
    ("J. Broadwood (1796)", "historical"),
    ("I. Pleyel (1835)", "historical"),
    ("J. Frenzel (1841)", "historical"),
    ("C. Bechstein (1899)", "historical"),
];

/// Color family of an instrument: the fixed table first, then a guess from the
/// engine's instrument class and name.
pub fn instrument_category(instr: &str, class: &str) -> &'static str {
    if let Some((_, category)) = KNOWN_INSTRUMENTS.iter().find(|(name, _)| *name == instr) {
        return *category;
    }

    let name = instr.to_lowercase();
    let has_any = |words: &[&str]| words.iter().any(|w| name.contains(*w));
    match class {
        "Acoustic Piano" => "piano",
        "Historical Piano" => "historical",
        "Electric Piano" if has_any(&["tines", "rhodes", "reeds", "wurlitzer"][..]) => {
            "electric-tines"
        }
        "Electric Piano" => "electric-keys",
        "Chromatic Percussion" if has_any(&["vibraphone", "vibes"][..]) => "vibraphone",
        "Chromatic Percussion" if has_any(&["marimba", "xylophone"][..]) => "percussion-wood",
        "Chromatic Percussion" => "percussion-mallet",
        "Steelpan" => "percussion-metal",
        "Piano Predecessor" if name.contains("harpsichord") => "harpsichord",
        "Piano Predecessor" if name.contains("harp") => "harp",
        "Piano Predecessor" => "historical",
        _ => "piano",
    }
}

/// Group presets by instrument in first-seen order, skipping unlicensed
/// presets unless `include_demo` is set. Presets without a name are dropped.
pub fn group_presets(presets: &[PresetInfo], include_demo: bool) -> Vec<Instrument> {
    let mut order: Vec<&str> = Vec::new();
    let mut classes: HashMap<&str, &str> = HashMap::new();
    let mut names: HashMap<&str, Vec<&str>> = HashMap::new();

    for info in presets {
        if !include_demo && !info.is_licensed() {
            continue;
        }
        if info.name.trim().is_empty() {
            log::debug!(target: "discovery", "skipping preset with empty name (instrument '{}')", info.instr);
            continue;
        }
        let instr = info.instr.as_str();
        names
            .entry(instr)
            .or_insert_with(|| {
                order.push(instr);
                classes.insert(instr, info.instrument_class.as_str());
                Vec::new()
            })
            .push(info.name.as_str());
    }

    order
        .into_iter()
        .map(|instr| {
            let class = classes.get(instr).copied().unwrap_or_default();
            let (primary, secondary) = category_colors(instrument_category(instr, class));
            let mut instrument = Instrument::new(instr, instr, primary, secondary);
            let preset_names = names.get(instr).map(Vec::as_slice).unwrap_or(&[]);
            instrument.presets = presets_with_display_names(preset_names);
            instrument
        })
        .collect()
}

/// Fetch the preset list and build instruments.
///
/// When nothing licensed is found, retries once with demo presets so an
/// unlicensed install still has something to play.
pub fn discover_instruments<G: EngineGateway + ?Sized>(
    gateway: &G,
    include_demo: bool,
) -> Result<Vec<Instrument>, CoreError> {
    let presets = gateway.list_presets()?;
    let instruments = group_presets(&presets, include_demo);
    log::info!(
        target: "discovery",
        "discovered {} instruments from Pianoteq API",
        instruments.len()
    );

    if instruments.is_empty() && !include_demo {
        log::info!(target: "discovery", "no licensed instruments found, including demo instruments");
        return Ok(group_presets(&presets, true));
    }
    Ok(instruments)
}

/// Poll `getActivationInfo` until the engine answers.
/// Returns whether the engine is licensed.
pub fn wait_for_api<G: EngineGateway + ?Sized>(
    gateway: &G,
    attempts: u32,
    interval: Duration,
) -> Result<bool, CoreError> {
    let mut last_error = String::from("no attempts made");
    for attempt in 1..=attempts {
        match gateway.is_licensed() {
            Ok(licensed) => {
                log::info!(target: "discovery", "Pianoteq API ready after {} attempt(s)", attempt);
                return Ok(licensed);
            }
            Err(e) => {
                log::debug!(target: "discovery", "API not ready (attempt {}): {}", attempt, e);
                last_error = e.to_string();
            }
        }
        if attempt < attempts {
            thread::sleep(interval);
        }
    }
    Err(CoreError::EngineUnavailable(last_error))
}

/// Startup path: wait for the API, discover (with demos on unlicensed installs)
/// and build the library. An empty catalog is an error.
pub fn load_library<G: EngineGateway + ?Sized>(
    gateway: &G,
    include_demo: bool,
    attempts: u32,
    interval: Duration,
) -> Result<Library, CoreError> {
    let licensed = wait_for_api(gateway, attempts, interval)?;
    if !licensed {
        log::info!(target: "discovery", "Pianoteq is unlicensed, including demo instruments");
    }
    let instruments = discover_instruments(gateway, include_demo || !licensed)?;
    let library = Library::new(instruments);
    if library.is_empty() {
        return Err(CoreError::EmptyCatalog);
    }
    log::info!(
        target: "discovery",
        "library ready: {} instruments, {} presets",
        library.instrument_count(),
        library.preset_count()
    );
    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::fake::{preset, FakeEngine};

    #[test]
    fn known_instruments_use_table() {
        assert_eq!(instrument_category("Vintage Reeds", "Electric Piano"), "electric-tines");
        assert_eq!(instrument_category("Celesta", "Chromatic Percussion"), "percussion-mallet");
        assert_eq!(instrument_category("J. Dohnal (1795)", "whatever"), "historical");
    }

    #[test]
    fn unknown_instruments_use_class_heuristics() {
        assert_eq!(instrument_category("New Grand", "Acoustic Piano"), "piano");
        assert_eq!(instrument_category("Wurlitzer 200", "Electric Piano"), "electric-tines");
        assert_eq!(instrument_category("Funky Keys", "Electric Piano"), "electric-keys");
        assert_eq!(instrument_category("Jazz Vibes", "Chromatic Percussion"), "vibraphone");
        assert_eq!(instrument_category("Bass Marimba", "Chromatic Percussion"), "percussion-wood");
        assert_eq!(instrument_category("Bells", "Chromatic Percussion"), "percussion-mallet");
        assert_eq!(instrument_category("Pan", "Steelpan"), "percussion-metal");
        assert_eq!(instrument_category("Harpsichord 2", "Piano Predecessor"), "harpsichord");
        assert_eq!(instrument_category("Lever Harp", "Piano Predecessor"), "harp");
        assert_eq!(instrument_category("Clavichord", "Piano Predecessor"), "historical");
        assert_eq!(instrument_category("Theremin", "Other"), "piano");
    }

    #[test]
    fn grouping_keeps_first_seen_order() {
        let presets = vec![
            preset("MKI Warm", "Vintage Tines MKI", "Electric Piano", true),
            preset("K2 Bright", "Grand K2", "Acoustic Piano", true),
            preset("MKI Dry", "Vintage Tines MKI", "Electric Piano", true),
        ];
        let instruments = group_presets(&presets, false);
        assert_eq!(instruments.len(), 2);
        assert_eq!(instruments[0].name, "Vintage Tines MKI");
        assert_eq!(instruments[0].presets.len(), 2);
        assert_eq!(instruments[0].presets[1].display_name, "Dry");
        assert_eq!(instruments[0].background_primary, "#af2523");
        assert_eq!(instruments[1].preset_prefix, "Grand K2");
        assert_eq!(instruments[1].presets[0].display_name, "K2 Bright");
    }

    #[test]
    fn blank_preset_names_are_skipped() {
        let instruments = group_presets(
            &[
                preset("", "A", "Acoustic Piano", true),
                preset("  ", "A", "Acoustic Piano", true),
                preset("A x", "A", "Acoustic Piano", true),
            ],
            false,
        );
        assert_eq!(instruments.len(), 1);
        let presets = &instruments[0].presets;
        assert_eq!(presets.len(), 1);
        assert_eq!(presets[0].name, "A x");
        assert_eq!(presets[0].display_name, "A x");
    }

    #[test]
    fn demo_presets_are_filtered() {
        let presets = vec![
            preset("K2 Bright", "Grand K2", "Acoustic Piano", true),
            preset("Harp Demo", "Concert Harp", "Piano Predecessor", false),
        ];
        assert_eq!(group_presets(&presets, false).len(), 1);
        assert_eq!(group_presets(&presets, true).len(), 2);
    }

    #[test]
    fn falls_back_to_demo_when_nothing_licensed() {
        let engine = FakeEngine::with_presets(vec![
            preset("Harp Demo", "Concert Harp", "Piano Predecessor", false),
        ]);
        let instruments = discover_instruments(&engine, false).unwrap();
        assert_eq!(instruments.len(), 1);
        assert_eq!(instruments[0].name, "Concert Harp");
    }

    #[test]
    fn empty_catalog_is_fatal() {
        let engine = FakeEngine::with_presets(Vec::new());
        let err = load_library(&engine, false, 1, Duration::ZERO).unwrap_err();
        assert!(matches!(err, CoreError::EmptyCatalog));
    }

    #[test]
    fn unlicensed_engine_includes_demos() {
        let engine = FakeEngine::with_presets(vec![
            preset("K2 Bright", "Grand K2", "Acoustic Piano", true),
            preset("Harp Demo", "Concert Harp", "Piano Predecessor", false),
        ]);
        *engine.licensed.lock().unwrap() = false;
        let library = load_library(&engine, false, 1, Duration::ZERO).unwrap();
        assert_eq!(library.instrument_count(), 2);
    }
}
