//! Field value model.
//!
//! Every field type that can take part in mapping implements [`Field`], which
//! exposes a mutable [`Slot`] for decoding and a read-only [`View`] for
//! encoding. The engines never need to know the concrete field type.

use crate::hooks::{MarshalValue, UnmarshalValue};
use chrono::{DateTime, FixedOffset, Utc};
use std::any::type_name;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::Arc;

/// A record field that can be decoded from and encoded to a column value.
///
/// Custom value types implement this by hand to plug into the per-field hook
/// layer:
///
/// ```
/// use rowbind_core::{Field, HookError, MarshalValue, Slot, UnmarshalValue, View};
///
/// #[derive(Default)]
/// struct Cents(i64);
///
/// impl UnmarshalValue for Cents {
///     fn unmarshal_value(&mut self, value: &str) -> Result<(), HookError> {
///         self.0 = value.replace('.', "").parse()?;
///         Ok(())
///     }
/// }
///
/// impl MarshalValue for Cents {
///     fn marshal_value(&self) -> String {
///         format!("{}.{:02}", self.0 / 100, self.0 % 100)
///     }
/// }
///
/// impl Field for Cents {
///     fn slot(&mut self) -> Slot<'_> {
///         Slot::Custom(self)
///     }
///
///     fn view(&self) -> View<'_> {
///         View::Custom(self)
///     }
/// }
/// ```
pub trait Field {
    fn slot(&mut self) -> Slot<'_>;
    fn view(&self) -> View<'_>;
}

/// Mutable handle to a field, used on decode.
pub enum Slot<'a> {
    Str(&'a mut String),
    Bool(&'a mut bool),
    Int(IntSlot<'a>),
    Uint(UintSlot<'a>),
    Float(FloatSlot<'a>),
    Time(TimeSlot<'a>),
    /// Optional field; the engine fills it only when a value is present.
    Optional(&'a mut dyn OptionalSlot),
    /// Field type with its own value hook.
    Custom(&'a mut dyn UnmarshalValue),
    /// Value hook reachable only through a shared handle, named by type.
    Shared(&'static str),
    /// Type the engine cannot convert, named by type.
    Unsupported(&'static str),
}

pub enum IntSlot<'a> {
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
}

impl IntSlot<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::Isize(_) => "isize",
        }
    }
}

pub enum UintSlot<'a> {
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
}

impl UintSlot<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::Usize(_) => "usize",
        }
    }
}

pub enum FloatSlot<'a> {
    F32(&'a mut f32),
    F64(&'a mut f64),
}

pub enum TimeSlot<'a> {
    Fixed(&'a mut DateTime<FixedOffset>),
    Utc(&'a mut DateTime<Utc>),
}

/// An optional field that can be filled with a fresh value.
pub trait OptionalSlot {
    /// Replace the current value with a default one and return its slot.
    fn fill(&mut self) -> Slot<'_>;
}

impl<T: Field + Default> OptionalSlot for Option<T> {
    fn fill(&mut self) -> Slot<'_> {
        self.insert(T::default()).slot()
    }
}

/// Read-only view of a field, used on encode.
pub enum View<'a> {
    Str(&'a str),
    Bool(bool),
    Int(i64),
    Uint(u64),
    F32(f32),
    F64(f64),
    Time(DateTime<FixedOffset>),
    /// Optional field holding no value.
    Absent,
    Custom(&'a dyn MarshalValue),
    Unsupported(&'static str),
}

impl Field for String {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Str(self)
    }

    fn view(&self) -> View<'_> {
        View::Str(self)
    }
}

impl Field for bool {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Bool(self)
    }

    fn view(&self) -> View<'_> {
        View::Bool(*self)
    }
}

macro_rules! impl_int_field {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Field for $ty {
                fn slot(&mut self) -> Slot<'_> {
                    Slot::Int(IntSlot::$variant(self))
                }

                fn view(&self) -> View<'_> {
                    View::Int(*self as i64)
                }
            }
        )*
    };
}

macro_rules! impl_uint_field {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Field for $ty {
                fn slot(&mut self) -> Slot<'_> {
                    Slot::Uint(UintSlot::$variant(self))
                }

                fn view(&self) -> View<'_> {
                    View::Uint(*self as u64)
                }
            }
        )*
    };
}

impl_int_field!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize);
impl_uint_field!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize);

impl Field for f32 {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Float(FloatSlot::F32(self))
    }

    fn view(&self) -> View<'_> {
        View::F32(*self)
    }
}

impl Field for f64 {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Float(FloatSlot::F64(self))
    }

    fn view(&self) -> View<'_> {
        View::F64(*self)
    }
}

impl Field for DateTime<FixedOffset> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Time(TimeSlot::Fixed(self))
    }

    fn view(&self) -> View<'_> {
        View::Time(*self)
    }
}

impl Field for DateTime<Utc> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Time(TimeSlot::Utc(self))
    }

    fn view(&self) -> View<'_> {
        View::Time(self.fixed_offset())
    }
}

impl<T: Field + Default> Field for Option<T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Optional(self)
    }

    fn view(&self) -> View<'_> {
        match self {
            Some(value) => value.view(),
            None => View::Absent,
        }
    }
}

impl<T: MarshalValue> Field for Arc<T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Shared(type_name::<Self>())
    }

    fn view(&self) -> View<'_> {
        View::Custom(&**self)
    }
}

impl<T: MarshalValue> Field for Rc<T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Shared(type_name::<Self>())
    }

    fn view(&self) -> View<'_> {
        View::Custom(&**self)
    }
}

macro_rules! impl_unsupported_field {
    ($([$($generics:tt)*] $ty:ty),* $(,)?) => {
        $(
            impl<$($generics)*> Field for $ty {
                fn slot(&mut self) -> Slot<'_> {
                    Slot::Unsupported(type_name::<Self>())
                }

                fn view(&self) -> View<'_> {
                    View::Unsupported(type_name::<Self>())
                }
            }
        )*
    };
}

impl_unsupported_field!(
    [T] Vec<T>,
    [K, V, S] HashMap<K, V, S>,
    [K, V] BTreeMap<K, V>,
);
