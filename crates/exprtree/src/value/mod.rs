//! Value representation for runtime values

mod display;
mod impls;
mod json;
mod numeric;
mod truthy;

pub use numeric::{BigNumber, Complex, UnitValue};
pub use truthy::is_truthy;

use indexmap::IndexMap;
use std::sync::Arc;

/// Runtime value produced by evaluating a compiled expression.
///
/// The set of kinds is closed so the truthiness predicate and the
/// serializer can match on it exhaustively:
/// - Scalars: null, booleans, plain numbers and text
/// - Numeric extensions: decimals, complex numbers, physical units
/// - Containers: matrices, objects and block result sets
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Scalars
    // ═══════════════════════════════════════════════════════════════════
    /// Explicit null
    Null,

    /// Boolean: `true` or `false`
    Bool(bool),

    /// Double precision number (default numeric kind)
    Number(f64),

    /// Heap-allocated string
    String(Arc<String>),

    // ═══════════════════════════════════════════════════════════════════
    // Numeric Extensions
    // ═══════════════════════════════════════════════════════════════════
    /// Arbitrary-precision decimal
    BigNumber(BigNumber),

    /// Complex number
    Complex(Complex),

    /// Quantity with a physical unit
    Unit(Arc<UnitValue>),

    // ═══════════════════════════════════════════════════════════════════
    // Containers
    // ═══════════════════════════════════════════════════════════════════
    /// Dense matrix (rows are nested matrices)
    Matrix(Arc<Vec<Value>>),

    /// String-keyed object, insertion ordered
    Object(Arc<IndexMap<String, Value>>),

    /// Visible results of a block, in evaluation order
    ResultSet(Arc<Vec<Value>>),
}
