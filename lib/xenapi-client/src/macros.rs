// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generators for the mechanical parts of the API surface.
//!
//! Each macro takes syntax close to the item it defines, so that grepping
//! for `struct VmRecord` or `enum VmPowerState` finds the invocation.

// Define one opaque reference newtype per managed class.
//
// A ref is only ever compared, stored and sent back; its content is never
// interpreted. The empty string is the null ref.
macro_rules! define_refs {
    {
        $(
            $(#[$meta:meta])*
            pub struct $name:ident = $class:literal;
        )+
    } => {
        $(
            $(#[$meta])*
            #[derive(
                Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
            )]
            pub struct $name(String);

            impl $name {
                /// Wire name of the class this ref points into.
                pub const CLASS: &'static str = $class;

                pub fn new<S: Into<String>>(id: S) -> Self {
                    Self(id.into())
                }

                pub fn null() -> Self {
                    Self(String::new())
                }

                pub fn is_null(&self) -> bool {
                    self.0.is_empty()
                }

                pub fn as_str(&self) -> &str {
                    &self.0
                }

                pub fn into_inner(self) -> String {
                    self.0
                }
            }

            impl ::std::fmt::Display for $name {
                fn fmt(
                    &self,
                    f: &mut ::std::fmt::Formatter<'_>,
                ) -> ::std::fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<String> for $name {
                fn from(id: String) -> Self {
                    Self(id)
                }
            }

            impl From<&str> for $name {
                fn from(id: &str) -> Self {
                    Self(id.to_string())
                }
            }

            impl $crate::codec::Codec for $name {
                fn encode(
                    &self,
                    _label: &str,
                ) -> Result<$crate::value::Value, $crate::error::CodecError> {
                    Ok($crate::value::Value::String(self.0.clone()))
                }

                fn decode(
                    label: &str,
                    value: &$crate::value::Value,
                ) -> Result<Self, $crate::error::CodecError> {
                    match value {
                        $crate::value::Value::String(id) => {
                            Ok(Self(id.clone()))
                        }
                        other => Err($crate::error::CodecError::mismatch(
                            label,
                            "string",
                            other,
                        )),
                    }
                }

                fn zero() -> Self {
                    Self::null()
                }
            }

            impl $crate::codec::MapKey for $name {
                fn to_key(
                    &self,
                    _label: &str,
                ) -> Result<String, $crate::error::CodecError> {
                    Ok(self.0.clone())
                }

                fn from_key(
                    _label: &str,
                    key: &str,
                ) -> Result<Self, $crate::error::CodecError> {
                    Ok(Self(key.to_string()))
                }
            }
        )+
    };
}
pub(crate) use define_refs;

// Define an enumeration with a stable wire label per variant.
//
// Every generated enum carries an extra `Unknown(String)` variant: labels
// introduced by newer servers decode into it and re-encode verbatim.
macro_rules! define_enum {
    {
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $label:literal
            ),+ $(,)?
        }
    } => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            /// A label not known to this version of the SDK.
            Unknown(String),
        }

        impl $name {
            /// Wire labels of all known variants, in declaration order.
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Unknown(label) => label,
                }
            }

            pub fn from_wire(label: &str) -> Self {
                match label {
                    $($label => Self::$variant,)+
                    other => Self::Unknown(other.to_string()),
                }
            }

            pub fn is_unknown(&self) -> bool {
                matches!(self, Self::Unknown(_))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(
                &self,
                f: &mut ::std::fmt::Formatter<'_>,
            ) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::codec::Codec for $name {
            fn encode(
                &self,
                _label: &str,
            ) -> Result<$crate::value::Value, $crate::error::CodecError> {
                Ok($crate::value::Value::String(self.as_str().to_string()))
            }

            fn decode(
                label: &str,
                value: &$crate::value::Value,
            ) -> Result<Self, $crate::error::CodecError> {
                match value {
                    $crate::value::Value::String(s) => Ok(Self::from_wire(s)),
                    other => Err($crate::error::CodecError::mismatch(
                        label, "string", other,
                    )),
                }
            }

            fn zero() -> Self {
                Self::Unknown(String::new())
            }
        }

        impl $crate::codec::MapKey for $name {
            fn to_key(
                &self,
                _label: &str,
            ) -> Result<String, $crate::error::CodecError> {
                Ok(self.as_str().to_string())
            }

            fn from_key(
                _label: &str,
                key: &str,
            ) -> Result<Self, $crate::error::CodecError> {
                Ok(Self::from_wire(key))
            }
        }
    };
}
pub(crate) use define_enum;

// Picks a record field's wire name: the field's own name unless an explicit
// one is given.
macro_rules! record_field_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident $wire:literal) => {
        $wire
    };
}
pub(crate) use record_field_name;

// Define the record type of a managed class.
//
// Records decode as a sweep over the expected fields: a missing field takes
// the zero value of its type and members the schema does not name are
// ignored. Each field is labelled `<Class>Record.<field>` in codec errors.
macro_rules! define_record {
    {
        $(#[$meta:meta])*
        pub struct $name:ident = $class:literal {
            $(
                $(#[$fmeta:meta])*
                pub $field:ident: $ty:ty $(= $wire:literal)?
            ),+ $(,)?
        }
    } => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name {
            $(
                $(#[$fmeta])*
                pub $field: $ty,
            )+
        }

        impl $name {
            /// Wire names of the record's fields, in schema order.
            pub const FIELDS: &'static [&'static str] = &[
                $($crate::macros::record_field_name!($field $($wire)?)),+
            ];
        }

        impl Default for $name {
            fn default() -> Self {
                <Self as $crate::codec::Codec>::zero()
            }
        }

        impl $crate::codec::Codec for $name {
            fn encode(
                &self,
                label: &str,
            ) -> Result<$crate::value::Value, $crate::error::CodecError> {
                let mut members = ::std::collections::BTreeMap::new();
                $(
                    let wire = $crate::macros::record_field_name!(
                        $field $($wire)?
                    );
                    let field_label = $crate::codec::child_label(
                        label,
                        &format!("{}Record.{}", $class, wire),
                    );
                    let encoded = $crate::codec::Codec::encode(
                        &self.$field,
                        &field_label,
                    )?;
                    members.insert(wire.to_string(), encoded);
                )+
                Ok($crate::value::Value::Struct(members))
            }

            fn decode(
                label: &str,
                value: &$crate::value::Value,
            ) -> Result<Self, $crate::error::CodecError> {
                let Some(members) = value.as_struct() else {
                    return Err($crate::error::CodecError::mismatch(
                        label, "struct", value,
                    ));
                };
                Ok(Self {
                    $(
                        $field: {
                            let wire = $crate::macros::record_field_name!(
                                $field $($wire)?
                            );
                            match members.get(wire) {
                                Some(member) => {
                                    <$ty as $crate::codec::Codec>::decode(
                                        &$crate::codec::child_label(
                                            label,
                                            &format!(
                                                "{}Record.{}",
                                                $class, wire
                                            ),
                                        ),
                                        member,
                                    )?
                                }
                                None => <$ty as $crate::codec::Codec>::zero(),
                            }
                        },
                    )+
                })
            }

            fn zero() -> Self {
                Self {
                    $($field: <$ty as $crate::codec::Codec>::zero(),)+
                }
            }
        }
    };
}
pub(crate) use define_record;

// Picks a parameter's wire label. The receiver of an instance method is
// called `self` on the wire.
macro_rules! wire_arg_name {
    (this) => {
        "self"
    };
    ($arg:ident $wire:literal) => {
        $wire
    };
    ($arg:ident) => {
        stringify!($arg)
    };
}
pub(crate) use wire_arg_name;

// Define the facade of a managed class: a unit struct whose associated
// functions are the class's remote operations.
//
// Each `fn` becomes one synchronous entry point. A `task fn` additionally
// gets an `async_` twin that calls `Async.<Class>.<op>` and returns the
// task ref. `fn name as wire(..)` emits a facade whose Rust name differs
// from its wire operation, which is how versioned overloads are spelled.
// A parameter may carry `= "label"` when its wire name is not a usable
// Rust identifier.
macro_rules! rpc_class {
    {
        $(#[$meta:meta])*
        pub struct $class:ident = $wire_class:literal;

        $($body:tt)*
    } => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $class;

        impl $class {
            /// Wire name of the class.
            pub const CLASS: &'static str = $wire_class;
        }

        $crate::macros::rpc_class!(@munch $class $wire_class; $($body)*);
    };

    (@munch $class:ident $wc:literal;) => {};

    (@munch $class:ident $wc:literal;
        $(#[$meta:meta])*
        task fn $name:ident as $wire:ident (
            $($arg:ident: $ty:ty $(= $warg:literal)?),* $(,)?
        ) -> $ret:ty;
        $($rest:tt)*
    ) => {
        $crate::macros::rpc_class!(@sync $class $wc [$(#[$meta])*]
            $name $wire ($($arg: $ty $(= $warg)?),*) -> $ret);
        $crate::macros::rpc_class!(@async $class $wc [$(#[$meta])*]
            $name $wire ($($arg: $ty $(= $warg)?),*));
        $crate::macros::rpc_class!(@munch $class $wc; $($rest)*);
    };

    (@munch $class:ident $wc:literal;
        $(#[$meta:meta])*
        task fn $name:ident (
            $($arg:ident: $ty:ty $(= $warg:literal)?),* $(,)?
        ) -> $ret:ty;
        $($rest:tt)*
    ) => {
        $crate::macros::rpc_class!(@sync $class $wc [$(#[$meta])*]
            $name $name ($($arg: $ty $(= $warg)?),*) -> $ret);
        $crate::macros::rpc_class!(@async $class $wc [$(#[$meta])*]
            $name $name ($($arg: $ty $(= $warg)?),*));
        $crate::macros::rpc_class!(@munch $class $wc; $($rest)*);
    };

    (@munch $class:ident $wc:literal;
        $(#[$meta:meta])*
        fn $name:ident as $wire:ident (
            $($arg:ident: $ty:ty $(= $warg:literal)?),* $(,)?
        ) -> $ret:ty;
        $($rest:tt)*
    ) => {
        $crate::macros::rpc_class!(@sync $class $wc [$(#[$meta])*]
            $name $wire ($($arg: $ty $(= $warg)?),*) -> $ret);
        $crate::macros::rpc_class!(@munch $class $wc; $($rest)*);
    };

    (@munch $class:ident $wc:literal;
        $(#[$meta:meta])*
        fn $name:ident (
            $($arg:ident: $ty:ty $(= $warg:literal)?),* $(,)?
        ) -> $ret:ty;
        $($rest:tt)*
    ) => {
        $crate::macros::rpc_class!(@sync $class $wc [$(#[$meta])*]
            $name $name ($($arg: $ty $(= $warg)?),*) -> $ret);
        $crate::macros::rpc_class!(@munch $class $wc; $($rest)*);
    };

    (@sync $class:ident $wc:literal [$(#[$meta:meta])*]
        $name:ident $wire:ident
        ($($arg:ident: $ty:ty $(= $warg:literal)?),*) -> $ret:ty
    ) => {
        impl $class {
            $(#[$meta])*
            pub async fn $name(
                session: &$crate::session::Session,
                $($arg: $ty),*
            ) -> Result<$ret, $crate::error::Error> {
                #[allow(unused_imports)]
                use $crate::codec::ToWire as _;

                let params = vec![$(
                    $arg.to_wire(concat!(
                        $wc, ".", stringify!($wire),
                        "(", $crate::macros::wire_arg_name!($arg $($warg)?), ")"
                    ))?
                ),*];
                session
                    .invoke(
                        concat!($wc, ".", stringify!($wire)),
                        params,
                        concat!($wc, ".", stringify!($wire), " -> "),
                    )
                    .await
            }
        }
    };

    (@async $class:ident $wc:literal [$(#[$meta:meta])*]
        $name:ident $wire:ident
        ($($arg:ident: $ty:ty $(= $warg:literal)?),*)
    ) => {
        ::paste::paste! {
            impl $class {
                $(#[$meta])*
                ///
                /// Asynchronous twin: starts the operation on the server and
                /// returns the task tracking it.
                pub async fn [<async_ $name>](
                    session: &$crate::session::Session,
                    $($arg: $ty),*
                ) -> Result<$crate::refs::TaskRef, $crate::error::Error> {
                    #[allow(unused_imports)]
                    use $crate::codec::ToWire as _;

                    let params = vec![$(
                        $arg.to_wire(concat!(
                            "Async.", $wc, ".", stringify!($wire),
                            "(",
                            $crate::macros::wire_arg_name!($arg $($warg)?),
                            ")"
                        ))?
                    ),*];
                    session
                        .invoke(
                            concat!("Async.", $wc, ".", stringify!($wire)),
                            params,
                            concat!(
                                "Async.", $wc, ".", stringify!($wire), " -> "
                            ),
                        )
                        .await
                }
            }
        }
    };
}
pub(crate) use rpc_class;
