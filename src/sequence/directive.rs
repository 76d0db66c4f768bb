//! Control-block directive parser.
//!
//! Each animation record embeds one line of the model script it was compiled
//! from. The line describes playback metadata and, crucially for stitching,
//! the base sequence the fragment was cut from and its authored frame range:
//!
//! ```text
//! ANI "S_RUNL" 1 "S_RUN" 0.1 0.1 M. "HUM_RUNLOOP_M01.ASC" F 1 40 FPS:10.0
//! ```
//!
//! The parser is lenient: plenty of shipped content carries
//! malformed numeric fields or stray trailing metadata, and a bad directive
//! must never cost us an otherwise-valid fragment. Every fallback taken is
//! recorded as a [`DirectiveWarning`] so callers can surface the leniency
//! instead of it being silently swallowed.

use smallvec::SmallVec;

/// First token that marks a parsable directive.
const SENTINEL: &str = "ANI";

/// Minimum token count: the sentinel plus ten positional fields.
const MIN_TOKENS: usize = 11;

/// Parsed playback/blending metadata of one animation fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlBlock {
    /// Logical animation name, e.g. `S_RUNL`.
    pub name: String,
    /// Playback layer, >= 1.
    pub layer: i32,
    /// Name of the follow-up animation, empty if none.
    pub next_anim: String,
    pub blend_in: f32,
    pub blend_out: f32,
    /// Raw flag token, e.g. `M.`, opaque to the pipeline.
    pub flags: String,
    /// Base sequence this fragment was cut from (source model name, extension
    /// stripped). Grouping key together with the fragment namespace.
    pub base_sequence_id: String,
    /// Playback direction token, `F` or `R`.
    pub direction: String,
    /// First authored frame of this fragment within the base sequence.
    pub start_frame: i32,
    /// Last authored frame (inclusive).
    pub end_frame: i32,
    /// Authored sample rate; `FPS:` trailing metadata overrides the default.
    pub sample_rate: f32,
    /// `CVS:` trailing metadata, 0.0 when absent.
    pub collision_volume_scale: f32,
}

/// One leniency fallback taken while parsing a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveWarning {
    /// A positional numeric field did not parse; the documented default was
    /// used instead.
    BadNumericField {
        field: &'static str,
        token: String,
    },
    /// A recognized trailing `KEY:VALUE` carried an unparsable value; the
    /// previous value was retained.
    BadMetadataValue {
        key: &'static str,
        token: String,
    },
}

impl std::fmt::Display for DirectiveWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadNumericField { field, token } => {
                write!(f, "non-numeric {field} token {token:?}, using default")
            }
            Self::BadMetadataValue { key, token } => {
                write!(f, "unparsable {key} value in {token:?}, keeping previous")
            }
        }
    }
}

/// A best-effort control block plus the fallbacks taken to obtain it.
#[derive(Debug, Clone)]
pub struct ParsedDirective {
    pub block: ControlBlock,
    pub warnings: SmallVec<[DirectiveWarning; 2]>,
}

/// Parses an embedded directive string.
///
/// Returns `None` when the directive is absent or structurally unusable
/// (wrong sentinel, fewer than 11 tokens); the fragment is then kept as a
/// standalone clip without base-sequence grouping. Numeric field fallbacks
/// never cause `None`; they are reported via
/// [`ParsedDirective::warnings`].
#[must_use]
pub fn parse_directive(source: &str) -> Option<ParsedDirective> {
    let tokens: Vec<&str> = source.split_whitespace().collect();
    if tokens.len() < MIN_TOKENS || tokens[0] != SENTINEL {
        return None;
    }

    let mut warnings: SmallVec<[DirectiveWarning; 2]> = SmallVec::new();

    let mut lenient_i32 = |field: &'static str, token: &str, default: i32| {
        strip_decor(token).parse::<i32>().unwrap_or_else(|_| {
            warnings.push(DirectiveWarning::BadNumericField {
                field,
                token: token.to_string(),
            });
            default
        })
    };

    let layer = lenient_i32("layer", tokens[2], 1);
    let start_frame = lenient_i32("start_frame", tokens[9], 0);
    let end_frame = lenient_i32("end_frame", tokens[10], 0);

    let mut lenient_f32 = |field: &'static str, token: &str, default: f32| {
        strip_decor(token).parse::<f32>().unwrap_or_else(|_| {
            warnings.push(DirectiveWarning::BadNumericField {
                field,
                token: token.to_string(),
            });
            default
        })
    };

    let blend_in = lenient_f32("blend_in", tokens[4], 0.0);
    let blend_out = lenient_f32("blend_out", tokens[5], 0.0);

    let mut sample_rate = 25.0;
    let mut collision_volume_scale = 0.0;
    for token in &tokens[MIN_TOKENS..] {
        let clean = strip_decor(token);
        let value = clean.rsplit(':').next().unwrap_or("");
        if clean.contains("FPS") {
            match value.parse::<f32>() {
                Ok(v) => sample_rate = v,
                Err(_) => warnings.push(DirectiveWarning::BadMetadataValue {
                    key: "FPS",
                    token: (*token).to_string(),
                }),
            }
        } else if clean.contains("CVS") {
            match value.parse::<f32>() {
                Ok(v) => collision_volume_scale = v,
                Err(_) => warnings.push(DirectiveWarning::BadMetadataValue {
                    key: "CVS",
                    token: (*token).to_string(),
                }),
            }
        }
        // Unrecognized trailing metadata is ignored outright.
    }

    let block = ControlBlock {
        name: strip_decor(tokens[1]),
        layer,
        next_anim: strip_decor(tokens[3]),
        blend_in,
        blend_out,
        flags: tokens[6].to_string(),
        base_sequence_id: base_sequence_id(tokens[7]),
        direction: tokens[8].to_string(),
        start_frame,
        end_frame,
        sample_rate,
        collision_volume_scale,
    };

    Some(ParsedDirective { block, warnings })
}

/// Strips the quote and parenthesis decoration script tokens carry.
fn strip_decor(token: &str) -> String {
    token
        .chars()
        .filter(|c| !matches!(c, '"' | '(' | ')'))
        .collect()
}

/// The base-sequence id is the quoted source-model filename with its
/// extension stripped.
fn base_sequence_id(token: &str) -> String {
    let clean = strip_decor(token);
    clean.split('.').next().unwrap_or(&clean).to_string()
}
