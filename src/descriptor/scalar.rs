//! Primitive field values: type tags, zero values and lossless conversion.
//!
//! A scalar slot is only ever touched through `&dyn Any`, so every read and
//! write goes through a downcast to the concrete primitive named by its
//! [`ScalarType`].
//!
//! Two conversion rules exist. [`ScalarValue::convert_to`] follows the `From`
//! impls std provides: identity and lossless widening. [`ScalarValue::cast_to`]
//! additionally accepts every numeric pair the way plain assignment does,
//! with `as` semantics: `i32 -> u32` reinterprets, `f64 -> i32` truncates
//! toward zero and saturates, and a non-zero number assigned to `bool` is
//! `true`. Casts into `char` are limited to `u8`, since other integers may not
//! be valid code points.

use std::any::{Any, TypeId};

use strum::{AsRefStr, Display, EnumIter};

use crate::descriptor::FieldKind;
use crate::traits::migration::MigrateValue;

macro_rules! scalar_types {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        /// Type tag of a primitive field.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
        #[strum(serialize_all = "lowercase")]
        pub enum ScalarType {
            $($variant),*
        }

        /// A primitive value lifted out of a record.
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum ScalarValue {
            $($variant($ty)),*
        }

        impl ScalarType {
            /// The zero value of this type (`Default::default()`).
            pub fn zero(self) -> ScalarValue {
                match self {
                    $(ScalarType::$variant => ScalarValue::$variant(<$ty>::default())),*
                }
            }

            /// Identity of the Rust primitive this tag stands for.
            pub fn value_type_id(self) -> TypeId {
                match self {
                    $(ScalarType::$variant => TypeId::of::<$ty>()),*
                }
            }

            /// Reads a value of this type out of `slot`.
            ///
            /// Returns `None` when `slot` does not hold this exact type.
            pub fn read(self, slot: &dyn Any) -> Option<ScalarValue> {
                match self {
                    $(ScalarType::$variant => slot.downcast_ref::<$ty>().copied().map(ScalarValue::$variant)),*
                }
            }
        }

        impl ScalarValue {
            pub fn scalar_type(&self) -> ScalarType {
                match self {
                    $(ScalarValue::$variant(_) => ScalarType::$variant),*
                }
            }

            /// Stores the value into `slot`, returning `false` when `slot` holds
            /// a different type.
            pub fn write_into(self, slot: &mut dyn Any) -> bool {
                match self {
                    $(ScalarValue::$variant(value) => match slot.downcast_mut::<$ty>() {
                        Some(target) => {
                            *target = value;
                            true
                        }
                        None => false,
                    }),*
                }
            }
        }

        $(
            impl MigrateValue for $ty {
                fn field_kind() -> FieldKind {
                    ScalarType::$variant.into()
                }
            }
        )*
    };
}

scalar_types! {
    Bool => bool,
    Char => char,
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    I128 => i128,
    Isize => isize,
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    U128 => u128,
    Usize => usize,
    F32 => f32,
    F64 => f64,
}

// Every arm is backed by a `From` impl in std; anything missing from this
// table has no lossless conversion.
macro_rules! widening {
    ($($source:ident => [$($target:ident: $target_ty:ty),* $(,)?]),* $(,)?) => {
        impl ScalarValue {
            /// Converts to `target` if the conversion is lossless.
            pub fn convert_to(self, target: ScalarType) -> Option<ScalarValue> {
                if self.scalar_type() == target {
                    return Some(self);
                }
                match (self, target) {
                    $($(
                        (ScalarValue::$source(value), ScalarType::$target) => {
                            Some(ScalarValue::$target(<$target_ty>::from(value)))
                        }
                    )*)*
                    _ => None,
                }
            }
        }
    };
}

widening! {
    Bool => [
        I8: i8, I16: i16, I32: i32, I64: i64, I128: i128, Isize: isize,
        U8: u8, U16: u16, U32: u32, U64: u64, U128: u128, Usize: usize,
        F32: f32, F64: f64,
    ],
    Char => [U32: u32, U64: u64, U128: u128],
    U8 => [
        Char: char, U16: u16, U32: u32, U64: u64, U128: u128, Usize: usize,
        I16: i16, I32: i32, I64: i64, I128: i128, Isize: isize, F32: f32, F64: f64,
    ],
    U16 => [
        U32: u32, U64: u64, U128: u128, Usize: usize,
        I32: i32, I64: i64, I128: i128, F32: f32, F64: f64,
    ],
    U32 => [U64: u64, U128: u128, I64: i64, I128: i128, F64: f64],
    U64 => [U128: u128, I128: i128],
    I8 => [I16: i16, I32: i32, I64: i64, I128: i128, Isize: isize, F32: f32, F64: f64],
    I16 => [I32: i32, I64: i64, I128: i128, Isize: isize, F32: f32, F64: f64],
    I32 => [I64: i64, I128: i128, F64: f64],
    I64 => [I128: i128],
    F32 => [F64: f64],
}

// `as` cast of one numeric value into any scalar target.
macro_rules! cast_numeric {
    ($value:expr, $target:expr) => {{
        let value = $value;
        match $target {
            ScalarType::Bool => Some(ScalarValue::Bool(value as f64 != 0.0)),
            ScalarType::Char => None,
            ScalarType::I8 => Some(ScalarValue::I8(value as i8)),
            ScalarType::I16 => Some(ScalarValue::I16(value as i16)),
            ScalarType::I32 => Some(ScalarValue::I32(value as i32)),
            ScalarType::I64 => Some(ScalarValue::I64(value as i64)),
            ScalarType::I128 => Some(ScalarValue::I128(value as i128)),
            ScalarType::Isize => Some(ScalarValue::Isize(value as isize)),
            ScalarType::U8 => Some(ScalarValue::U8(value as u8)),
            ScalarType::U16 => Some(ScalarValue::U16(value as u16)),
            ScalarType::U32 => Some(ScalarValue::U32(value as u32)),
            ScalarType::U64 => Some(ScalarValue::U64(value as u64)),
            ScalarType::U128 => Some(ScalarValue::U128(value as u128)),
            ScalarType::Usize => Some(ScalarValue::Usize(value as usize)),
            ScalarType::F32 => Some(ScalarValue::F32(value as f32)),
            ScalarType::F64 => Some(ScalarValue::F64(value as f64)),
        }
    }};
}

macro_rules! assignment_casts {
    ($($variant:ident),* $(,)?) => {
        impl ScalarValue {
            /// Converts to `target` the way plain assignment would.
            ///
            /// Lossless conversions are tried first; otherwise numeric pairs
            /// are cast with `as`. Returns `None` only for pairs no
            /// assignment covers, such as `u32 -> char`.
            pub fn cast_to(self, target: ScalarType) -> Option<ScalarValue> {
                if let Some(value) = self.convert_to(target) {
                    return Some(value);
                }
                match self {
                    $(ScalarValue::$variant(value) => cast_numeric!(value, target),)*
                    ScalarValue::Bool(value) => cast_numeric!(u8::from(value), target),
                    ScalarValue::Char(value) => cast_numeric!(u32::from(value), target),
                }
            }
        }
    };
}

assignment_casts!(I8, I16, I32, I64, I128, Isize, U8, U16, U32, U64, U128, Usize, F32, F64);

impl ScalarType {
    /// Whether a value of this type converts losslessly into a `target` slot.
    pub fn converts_to(self, target: ScalarType) -> bool {
        self.zero().convert_to(target).is_some()
    }

    /// Whether plain assignment can store a value of this type into a
    /// `target` slot, possibly losing information.
    pub fn casts_to(self, target: ScalarType) -> bool {
        self.zero().cast_to(target).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;
    use strum::IntoEnumIterator;

    #[test]
    fn test_zero_values() {
        assert_eq!(ScalarType::I32.zero(), ScalarValue::I32(0));
        assert_eq!(ScalarType::F64.zero(), ScalarValue::F64(0.0));
        assert_eq!(ScalarType::Bool.zero(), ScalarValue::Bool(false));
        assert_eq!(ScalarType::Char.zero(), ScalarValue::Char('\0'));
    }

    #[test]
    fn test_every_type_converts_to_itself() {
        for ty in ScalarType::iter() {
            assert!(ty.converts_to(ty), "{ty} should convert to itself");
        }
    }

    #[test]
    fn test_narrowing_is_rejected() {
        assert!(!ScalarType::I64.converts_to(ScalarType::I32));
        assert!(!ScalarType::F64.converts_to(ScalarType::F32));
        assert!(!ScalarType::F64.converts_to(ScalarType::I32));
        assert!(!ScalarType::I32.converts_to(ScalarType::U32));
        assert!(!ScalarType::Usize.converts_to(ScalarType::U64));
    }

    #[test]
    fn test_widening_is_accepted() {
        assert!(ScalarType::I32.converts_to(ScalarType::I64));
        assert!(ScalarType::I32.converts_to(ScalarType::F64));
        assert!(ScalarType::U8.converts_to(ScalarType::Char));
        assert!(ScalarType::Bool.converts_to(ScalarType::U8));
        assert!(ScalarType::F32.converts_to(ScalarType::F64));
        assert!(ScalarType::Bool.converts_to(ScalarType::F32));
        assert!(ScalarType::Bool.converts_to(ScalarType::F64));
        assert_eq!(
            ScalarValue::Bool(true).convert_to(ScalarType::F64),
            Some(ScalarValue::F64(1.0))
        );
    }

    #[test]
    fn test_assignment_casts() {
        assert_eq!(
            ScalarValue::I32(5).cast_to(ScalarType::U32),
            Some(ScalarValue::U32(5))
        );
        assert_eq!(
            ScalarValue::I32(-1).cast_to(ScalarType::U32),
            Some(ScalarValue::U32(u32::MAX))
        );
        assert_eq!(
            ScalarValue::F64(2.9).cast_to(ScalarType::I32),
            Some(ScalarValue::I32(2))
        );
        assert_eq!(
            ScalarValue::F64(1.0e12).cast_to(ScalarType::I32),
            Some(ScalarValue::I32(i32::MAX))
        );
        assert_eq!(
            ScalarValue::I64(300).cast_to(ScalarType::U8),
            Some(ScalarValue::U8(44))
        );
        assert_eq!(
            ScalarValue::I16(-7).cast_to(ScalarType::Bool),
            Some(ScalarValue::Bool(true))
        );
        assert_eq!(
            ScalarValue::Char('A').cast_to(ScalarType::I8),
            Some(ScalarValue::I8(65))
        );
        // Lossless pairs keep their `From` result
        assert_eq!(
            ScalarValue::U8(66).cast_to(ScalarType::Char),
            Some(ScalarValue::Char('B'))
        );
    }

    #[test]
    fn test_casts_never_produce_chars_from_wide_integers() {
        assert!(!ScalarType::U32.casts_to(ScalarType::Char));
        assert!(!ScalarType::F64.casts_to(ScalarType::Char));
        assert!(ScalarType::U8.casts_to(ScalarType::Char));
    }

    #[test]
    fn test_every_numeric_pair_casts() {
        for source in ScalarType::iter().filter(|ty| *ty != ScalarType::Char) {
            for target in ScalarType::iter().filter(|ty| *ty != ScalarType::Char) {
                assert!(source.casts_to(target), "{source} should cast to {target}");
            }
        }
    }

    #[test]
    fn test_type_ids() {
        assert_eq!(ScalarType::I32.value_type_id(), TypeId::of::<i32>());
        assert_eq!(ScalarType::Usize.value_type_id(), TypeId::of::<usize>());
        assert_ne!(ScalarType::U64.value_type_id(), TypeId::of::<i64>());
    }

    #[test]
    fn test_read_and_write_through_any() {
        let mut slot: i32 = 5;
        assert_eq!(ScalarType::I32.read(&slot), Some(ScalarValue::I32(5)));
        assert_eq!(ScalarType::I64.read(&slot), None);

        assert!(ScalarValue::I32(9).write_into(&mut slot));
        assert_eq!(slot, 9);
        assert!(!ScalarValue::I64(9).write_into(&mut slot));
        assert_eq!(slot, 9);
    }

    #[test]
    fn test_display_uses_rust_names() {
        assert_eq!(ScalarType::I32.to_string(), "i32");
        assert_eq!(ScalarType::Usize.to_string(), "usize");
        assert_eq!(ScalarType::F64.as_ref(), "f64");
    }

    quickcheck! {
        fn prop_i32_to_i64_preserves_value(value: i32) -> bool {
            ScalarValue::I32(value).convert_to(ScalarType::I64) == Some(ScalarValue::I64(i64::from(value)))
        }

        fn prop_i32_to_f64_preserves_value(value: i32) -> bool {
            ScalarValue::I32(value).convert_to(ScalarType::F64) == Some(ScalarValue::F64(f64::from(value)))
        }

        fn prop_u16_to_u32_preserves_value(value: u16) -> bool {
            ScalarValue::U16(value).convert_to(ScalarType::U32) == Some(ScalarValue::U32(u32::from(value)))
        }

        fn prop_narrowing_never_converts(value: i64) -> bool {
            ScalarValue::I64(value).convert_to(ScalarType::I32).is_none()
        }

        fn prop_narrowing_cast_matches_as(value: i64) -> bool {
            ScalarValue::I64(value).cast_to(ScalarType::I32) == Some(ScalarValue::I32(value as i32))
        }

        fn prop_sign_change_cast_round_trips(value: i32) -> bool {
            ScalarValue::I32(value)
                .cast_to(ScalarType::U32)
                .and_then(|cast| cast.cast_to(ScalarType::I32))
                == Some(ScalarValue::I32(value))
        }
    }
}
