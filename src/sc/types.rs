use std::fmt;

/// Static type of a value in generated code.
///
/// Vector and matrix lane counts are always in `2..=4`; use the checked
/// constructors to build them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScType {
    Num,
    Bool,
    /// 32 booleans packed into one unsigned word.
    Bool32,
    Vec(u8),
    BVec(u8),
    Bool32Vec(u8),
    /// Square matrix of `n` columns, each a `Vec(n)`.
    Mat(u8),
    /// No representation in generated code.
    Error,
}

fn valid_lanes(n: usize) -> Option<u8> {
    if (2..=4).contains(&n) {
        Some(n as u8)
    } else {
        None
    }
}

impl ScType {
    pub fn vec(n: usize) -> Option<ScType> {
        valid_lanes(n).map(ScType::Vec)
    }

    pub fn bvec(n: usize) -> Option<ScType> {
        valid_lanes(n).map(ScType::BVec)
    }

    pub fn bool32_vec(n: usize) -> Option<ScType> {
        valid_lanes(n).map(ScType::Bool32Vec)
    }

    pub fn mat(n: usize) -> Option<ScType> {
        valid_lanes(n).map(ScType::Mat)
    }

    pub fn is_num(&self) -> bool {
        *self == ScType::Num
    }

    pub fn is_bool(&self) -> bool {
        *self == ScType::Bool
    }

    pub fn is_bool32(&self) -> bool {
        *self == ScType::Bool32
    }

    /// Num, Vec or Mat.
    pub fn is_num_struc(&self) -> bool {
        matches!(self, ScType::Num | ScType::Vec(_) | ScType::Mat(_))
    }

    /// Bool or BVec.
    pub fn is_bool_or_vec(&self) -> bool {
        matches!(self, ScType::Bool | ScType::BVec(_))
    }

    /// Bool32 or a vector of Bool32.
    pub fn is_bool32_or_vec(&self) -> bool {
        matches!(self, ScType::Bool32 | ScType::Bool32Vec(_))
    }

    pub fn is_bool_struc(&self) -> bool {
        self.is_bool_or_vec() || self.is_bool32_or_vec()
    }

    /// Any type that generated code can hold.
    pub fn is_struc(&self) -> bool {
        *self != ScType::Error
    }

    pub fn is_any_vec(&self) -> bool {
        matches!(self, ScType::Vec(_) | ScType::BVec(_) | ScType::Bool32Vec(_))
    }

    pub fn is_mat(&self) -> bool {
        matches!(self, ScType::Mat(_))
    }

    /// Lane count: 1 for scalars, `n` for vectors and matrices.
    pub fn count(&self) -> u8 {
        match self {
            ScType::Vec(n) | ScType::BVec(n) | ScType::Bool32Vec(n) | ScType::Mat(n) => *n,
            _ => 1,
        }
    }

    /// The scalar each lane is built from.
    pub fn scalar_type(&self) -> ScType {
        match self {
            ScType::Num | ScType::Vec(_) | ScType::Mat(_) => ScType::Num,
            ScType::Bool | ScType::BVec(_) => ScType::Bool,
            ScType::Bool32 | ScType::Bool32Vec(_) => ScType::Bool32,
            ScType::Error => ScType::Error,
        }
    }

    /// Type of a single lane: a column for matrices, the scalar for vectors.
    pub fn elem_type(&self) -> ScType {
        match self {
            ScType::Mat(n) => ScType::Vec(*n),
            other => other.scalar_type(),
        }
    }

    /// A `count`-lane vector of this type's scalar; the scalar itself for 1.
    pub fn with_count(&self, count: u8) -> ScType {
        if count == 1 {
            return self.scalar_type();
        }
        match self.scalar_type() {
            ScType::Num => ScType::Vec(count),
            ScType::Bool => ScType::BVec(count),
            ScType::Bool32 => ScType::Bool32Vec(count),
            _ => ScType::Error,
        }
    }

    /// GLSL spelling of the type.
    pub fn glsl_name(&self) -> String {
        match self {
            ScType::Num => "float".into(),
            ScType::Bool => "bool".into(),
            ScType::Bool32 => "uint".into(),
            ScType::Vec(n) => format!("vec{}", n),
            ScType::BVec(n) => format!("bvec{}", n),
            ScType::Bool32Vec(n) => format!("uvec{}", n),
            ScType::Mat(n) => format!("mat{}", n),
            ScType::Error => "<error>".into(),
        }
    }

    /// Parses a GLSL type name, the inverse of [`ScType::glsl_name`].
    pub fn from_glsl_name(name: &str) -> Option<ScType> {
        let lanes = |prefix: &str| -> Option<usize> {
            name.strip_prefix(prefix)?.parse::<usize>().ok()
        };
        match name {
            "float" => Some(ScType::Num),
            "bool" => Some(ScType::Bool),
            "uint" => Some(ScType::Bool32),
            _ if name.starts_with("bvec") => ScType::bvec(lanes("bvec")?),
            _ if name.starts_with("uvec") => ScType::bool32_vec(lanes("uvec")?),
            _ if name.starts_with("vec") => ScType::vec(lanes("vec")?),
            _ if name.starts_with("mat") => ScType::mat(lanes("mat")?),
            _ => None,
        }
    }
}

impl fmt::Display for ScType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScType::Num => f.write_str("Num"),
            ScType::Bool => f.write_str("Bool"),
            ScType::Bool32 => f.write_str("Bool32"),
            ScType::Vec(n) => write!(f, "Vec{}", n),
            ScType::BVec(n) => write!(f, "BVec{}", n),
            ScType::Bool32Vec(n) => write!(f, "Bool32[{}]", n),
            ScType::Mat(n) => write!(f, "Mat{}", n),
            ScType::Error => f.write_str("Error"),
        }
    }
}
