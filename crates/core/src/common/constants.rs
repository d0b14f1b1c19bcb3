//! Crate-wide constants.

/// Earth radius in kilometers used for every reference distance.
pub const EARTH_RADIUS_KM: f64 = 6372.8;

/// Degrees-to-radians multiplier.
///
/// This is the truncated factor the existing ground-truth files were produced
/// with, not `PI / 180`. Switching to the full-precision constant changes the
/// last significant digits of every stored distance.
pub const DEG_TO_RAD: f64 = 0.01745329238;

/// Number of clusters produced in cluster mode.
pub const CLUSTER_COUNT: usize = 4;

/// Decimal places kept for coordinates in normal mode.
pub const COORDINATE_DECIMALS: i32 = 4;

/// Default tolerance (km) when verifying ground truth.
pub const VERIFY_TOLERANCE_KM: f64 = 0.1;

/// Default file name of the binary ground-truth artifact.
pub const GROUND_TRUTH_FILE: &str = "results.bin";

/// Default file name of the JSON companion artifact.
pub const PAIRS_FILE: &str = "data.json";

/// Suffix appended to a listing name for its captured disassembly.
pub const DISASSEMBLY_SUFFIX: &str = "-disassembly";

/// Assembly source extension.
pub const ASM_EXTENSION: &str = "asm";

/// Tool argument placeholders.
pub mod placeholders {
    /// Assembler input source.
    pub const INPUT: &str = "{input}";
    /// Assembler output binary.
    pub const OUTPUT: &str = "{output}";
    /// Binary handed to the decoder.
    pub const BINARY: &str = "{binary}";
    /// Decoder execution-mode flag.
    pub const MODE: &str = "{mode}";
    /// Original binary handed to the diff tool.
    pub const ORIGINAL: &str = "{original}";
    /// Reassembled binary handed to the diff tool.
    pub const REASSEMBLED: &str = "{reassembled}";
}
