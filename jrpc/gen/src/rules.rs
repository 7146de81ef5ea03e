//! Validation rule compilation.
//!
//! Turns a field's options and resolved type into [`FieldRules`], the
//! checks the generated `validate` runs for that field. Every option is
//! checked against the resolved type here, before any code is emitted.

use jrpc_define::{Bound, Field, ScalarKind};

use crate::errors::GeneratorError;
use crate::resolver::{Container, ResolvedType};

/// How nested messages of a field are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurse {
    /// Validate the nested message when present.
    Single,
    /// Validate every element, stopping at the first failure.
    Repeated,
    /// Validate every map value, stopping at the first failure.
    MapValues,
}

/// The checks compiled for one field, run in declaration order:
/// recursion, required, min, max.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRules {
    pub recurse: Option<Recurse>,
    pub required: bool,
    pub min: Option<Bound>,
    pub max: Option<Bound>,
}

impl FieldRules {
    /// `true` when the field contributes nothing to `validate`.
    pub fn is_empty(&self) -> bool {
        self.recurse.is_none() && !self.required && self.min.is_none() && self.max.is_none()
    }
}

/// Compiles the rules for `field`.
///
/// ## Errors
///
/// Returns [`GeneratorError::IncompatibleOption`] when:
/// - `required` is declared on a repeated or map field
/// - `min`/`max` is declared on a non-numeric or collection field
/// - a fractional bound is declared on an integer field
/// - an integer bound lies outside the field's integer range
/// - `min` is greater than `max`
///
/// ## Examples
///
/// ```
/// use jrpc_define::{Bound, Field, FieldType, ScalarKind, CompilationUnit};
/// use jrpc_gen::resolver::{resolve, ImportSet};
/// use jrpc_gen::rules::compile;
///
/// let unit = CompilationUnit::new("scenedef");
/// let field = Field::new("brightness", FieldType::Scalar(ScalarKind::Uint32))
///     .max(Bound::Int(100));
/// let resolved = resolve(&field.ty, &unit, &mut ImportSet::default(), "field").unwrap();
///
/// let rules = compile(&field, &resolved, "field 'brightness'").unwrap();
/// assert_eq!(rules.max, Some(Bound::Int(100)));
/// assert!(!rules.required);
/// ```
pub fn compile(
    field: &Field,
    resolved: &ResolvedType,
    location: &str,
) -> Result<FieldRules, GeneratorError> {
    let options = &field.options;

    let recurse = resolved.is_message.then(|| match resolved.container {
        Container::Single => Recurse::Single,
        Container::Repeated => Recurse::Repeated,
        Container::Map { .. } => Recurse::MapValues,
    });

    if options.required && !resolved.is_optional() {
        return Err(GeneratorError::incompatible(
            location,
            "required",
            "repeated and map fields cannot be required",
        ));
    }

    let mut min = options.min;
    let mut max = options.max;

    if min.is_some() || max.is_some() {
        let Some(kind) = resolved.numeric_kind() else {
            let option = if min.is_some() { "min" } else { "max" };
            return Err(GeneratorError::incompatible(
                location,
                option,
                "bounds apply only to singular numeric fields",
            ));
        };

        if let Some(bound) = min {
            check_bound(kind, bound, "min", location)?;
        }
        if let Some(bound) = max {
            check_bound(kind, bound, "max", location)?;
        }

        if let (Some(lo), Some(hi)) = (min, max)
            && exceeds(lo, hi)
        {
            return Err(GeneratorError::incompatible(
                location,
                "min",
                format!("min {} is greater than max {}", lo, hi),
            ));
        }

        // A bound at the edge of an integer type's range can never fail.
        if let Some((lo, hi)) = kind.integer_range() {
            min = min.filter(|b| !b.as_i128().is_some_and(|v| v <= lo));
            max = max.filter(|b| !b.as_i128().is_some_and(|v| v >= hi));
        }
    }

    Ok(FieldRules {
        recurse,
        required: options.required,
        min,
        max,
    })
}

/// Whether `lo` is greater than `hi`, exactly when both are integers.
fn exceeds(lo: Bound, hi: Bound) -> bool {
    match (lo.as_i128(), hi.as_i128()) {
        (Some(lo), Some(hi)) => lo > hi,
        _ => lo.as_f64() > hi.as_f64(),
    }
}

fn check_bound(
    kind: ScalarKind,
    bound: Bound,
    option: &str,
    location: &str,
) -> Result<(), GeneratorError> {
    match (kind.integer_range(), bound.as_i128()) {
        (Some(_), None) => Err(GeneratorError::incompatible(
            location,
            option,
            format!("fractional bound {} on integer field of kind '{}'", bound, kind),
        )),
        (Some((lo, hi)), Some(value)) if value < lo || value > hi => {
            Err(GeneratorError::incompatible(
                location,
                option,
                format!("bound {} is outside the range of '{}'", bound, kind),
            ))
        }
        (None, None) if !bound.as_f64().is_finite() => Err(GeneratorError::incompatible(
            location,
            option,
            "bounds must be finite",
        )),
        _ => Ok(()),
    }
}
