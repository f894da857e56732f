//! Sanitation of raw catalog embeddings into fixed-dimension vectors.
//!
//! Catalog rows come from an untrusted export: the `vector` column may be
//! empty, unparsable, or produced by a different embedding model with a
//! different dimension. Rather than fail the whole startup, every row is
//! coerced into the configured dimension; rows that cannot be recovered get
//! a zero vector, which keeps catalog positions and index positions aligned
//! 1:1 while opting the row out of matching.
//!
//! Sanitation is a pure function returning a tagged result; the caller
//! decides how to report anomalies.

use crate::vector::VectorDimension;

/// Why a raw row could not be used as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// The vector cell was absent or blank.
    Missing,
    /// The cell could not be parsed as a numeric sequence.
    Unparsable(String),
    /// The parsed sequence had a length that is neither D nor 2D.
    LengthMismatch { found: usize },
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "vector cell is missing or empty"),
            Self::Unparsable(reason) => write!(f, "vector cell is unparsable: {reason}"),
            Self::LengthMismatch { found } => {
                write!(f, "vector has {found} dimensions")
            }
        }
    }
}

/// Outcome of sanitizing one raw row.
///
/// `vector` always has exactly the target dimension. `anomaly` is `Some`
/// when the row needed recovery and a diagnostic should be emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized {
    pub vector: Vec<f32>,
    pub anomaly: Option<Anomaly>,
}

impl Sanitized {
    fn clean(vector: Vec<f32>) -> Self {
        Self {
            vector,
            anomaly: None,
        }
    }

    fn fallback(target: VectorDimension, anomaly: Anomaly) -> Self {
        Self {
            vector: vec![0.0; target.get()],
            anomaly: Some(anomaly),
        }
    }
}

/// Coerces a raw vector cell into a vector of exactly `target` dimensions.
///
/// Recovery policy, in priority order:
/// 1. Missing or blank cell: zero vector.
/// 2. Unparsable cell: zero vector.
/// 3. Exactly D values: returned unchanged.
/// 4. Exactly 2D values: truncated to the first D. This mirrors catalogs
///    where some rows were produced by a 768-dim model; truncation is a
///    deterministic recovery rule, not dimensionality reduction.
/// 5. Any other length: zero vector.
///
/// Total: never fails the caller.
pub fn sanitize(raw: Option<&str>, target: VectorDimension) -> Sanitized {
    let dim = target.get();

    let text = match raw {
        Some(t) if !t.trim().is_empty() => t.trim(),
        _ => return Sanitized::fallback(target, Anomaly::Missing),
    };

    let values = match parse_numeric_sequence(text) {
        Ok(values) => values,
        Err(reason) => return Sanitized::fallback(target, Anomaly::Unparsable(reason)),
    };

    if values.len() == dim {
        Sanitized::clean(values)
    } else if values.len() == 2 * dim {
        Sanitized {
            vector: values[..dim].to_vec(),
            anomaly: Some(Anomaly::LengthMismatch { found: 2 * dim }),
        }
    } else {
        let found = values.len();
        Sanitized::fallback(target, Anomaly::LengthMismatch { found })
    }
}

/// Parses a literal numeric sequence such as `[0.1, -2.5, 3e-4]`.
///
/// Accepts optional surrounding brackets or parentheses. Non-finite values
/// are rejected so the index never has to order NaN distances.
fn parse_numeric_sequence(text: &str) -> Result<Vec<f32>, String> {
    let inner = strip_delimiters(text)?;
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut values = Vec::new();
    for token in inner.split(',') {
        let token = token.trim();
        let value: f32 = token
            .parse()
            .map_err(|e| format!("invalid number '{token}': {e}"))?;
        if !value.is_finite() {
            return Err(format!("non-finite value '{token}'"));
        }
        values.push(value);
    }
    Ok(values)
}

fn strip_delimiters(text: &str) -> Result<&str, String> {
    let bytes = text.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(b'['), Some(b']')) | (Some(b'('), Some(b')')) => Ok(&text[1..text.len() - 1]),
        (Some(b'[') | Some(b'('), _) | (_, Some(b']') | Some(b')')) => {
            Err("unbalanced sequence delimiters".to_string())
        }
        _ => Ok(text),
    }
}
