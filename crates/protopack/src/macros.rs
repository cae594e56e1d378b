//! Scalar method families for the writer and reader.

/// Defines the fixed-width big-endian scalars of the wire format.
/// Arguments passed to callback:
/// 1. Write method name
/// 2. Read method name
/// 3. Rust type
macro_rules! for_each_fixed {
    ($m:ident) => {
        $m!(write_short,          read_short,          i16);
        $m!(write_unsigned_short, read_unsigned_short, u16);
        $m!(write_int,            read_int,            i32);
        $m!(write_unsigned_int,   read_unsigned_int,   u32);
        $m!(write_float,          read_float,          f32);
        $m!(write_double,         read_double,         f64);
    };
}

/// Defines the variable-length integers of the wire format.
/// Arguments passed to callback:
/// 1. Write method name
/// 2. Read method name
/// 3. Rust type
/// 4. Unsigned carrier type
/// 5. Bit width
macro_rules! for_each_var {
    ($m:ident) => {
        $m!(write_var_short,    read_var_short,    i16, u16, 16);
        $m!(write_var_uh_short, read_var_uh_short, u16, u16, 16);
        $m!(write_var_int,      read_var_int,      i32, u32, 32);
        $m!(write_var_uh_int,   read_var_uh_int,   u32, u32, 32);
        $m!(write_var_long,     read_var_long,     i64, u64, 64);
        $m!(write_var_uh_long,  read_var_uh_long,  u64, u64, 64);
    };
}

/// Generates big-endian writes for the Writer.
macro_rules! write_fixed {
    ($write:ident, $read:ident, $ty:ty) => {
        #[inline]
        pub fn $write(&mut self, v: $ty) -> crate::types::Result<&mut Self> {
            self.buf.extend_from_slice(&v.to_be_bytes());
            Ok(self)
        }
    };
}

/// Generates big-endian reads for the Reader.
macro_rules! read_fixed {
    ($write:ident, $read:ident, $ty:ty) => {
        #[inline]
        pub fn $read(&mut self) -> crate::types::Result<$ty> {
            let bytes = self.read_bytes(std::mem::size_of::<$ty>())?;
            let mut raw = [0u8; std::mem::size_of::<$ty>()];
            raw.copy_from_slice(bytes);
            Ok(<$ty>::from_be_bytes(raw))
        }
    };
}

/// Generates 7-bit group writes for the Writer.
macro_rules! write_var {
    ($write:ident, $read:ident, $ty:ty, $carrier:ty, $bits:expr) => {
        #[inline]
        pub fn $write(&mut self, v: $ty) -> crate::types::Result<&mut Self> {
            self.write_var_raw(v as $carrier as u64)
        }
    };
}

/// Generates 7-bit group reads for the Reader.
macro_rules! read_var {
    ($write:ident, $read:ident, $ty:ty, $carrier:ty, $bits:expr) => {
        #[inline]
        pub fn $read(&mut self) -> crate::types::Result<$ty> {
            Ok(self.read_var_raw($bits)? as $carrier as $ty)
        }
    };
}

pub(crate) use for_each_fixed;
pub(crate) use for_each_var;
pub(crate) use write_fixed;
pub(crate) use read_fixed;
pub(crate) use write_var;
pub(crate) use read_var;
