/// Declare a choice family: a closed enum of built-in variants plus an
/// `Extension` arm for registered third-party variants.
///
/// Every listed variant type must implement
/// [`ChoiceValue`](crate::choice::ChoiceValue). The macro derives
/// `From` for each variant type and wires the family into the codec
/// and validation.
#[macro_export]
macro_rules! choice_family {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident = $family:literal {
            $( $(#[$vmeta:meta])* $variant:ident($ty:ty) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant($ty), )+
            /// A registered third-party variant.
            Extension(::std::boxed::Box<dyn $crate::choice::ChoiceValue>),
        }

        $(
            impl ::std::convert::From<$ty> for $name {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+

        impl $crate::choice::TypeChoice for $name {
            const FAMILY: &'static str = $family;

            fn variant(&self) -> &dyn $crate::choice::ChoiceValue {
                match self {
                    $( Self::$variant(value) => value as &dyn $crate::choice::ChoiceValue, )+
                    Self::Extension(value) => &**value,
                }
            }

            fn from_extension(value: ::std::boxed::Box<dyn $crate::choice::ChoiceValue>) -> Self {
                Self::Extension(value)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt($crate::choice::TypeChoice::variant(self), f)
            }
        }

        impl $crate::codec::FieldValue for $name {
            fn encode<F: $crate::codec::Format>(
                &self,
                _cx: &$crate::codec::Context<'_>,
            ) -> ::std::result::Result<F::Value, $crate::codec::CodecError> {
                F::encode_choice(self)
            }

            fn decode<F: $crate::codec::Format>(
                value: F::Value,
                cx: &$crate::codec::Context<'_>,
            ) -> ::std::result::Result<Self, $crate::codec::CodecError> {
                F::decode_choice(value, cx.choices::<Self>()?)
            }
        }

        impl $crate::validate::Validate for $name {
            fn validate(&self) -> ::std::result::Result<(), $crate::validate::ValidateError> {
                $crate::choice::TypeChoice::variant(self)
                    .validate()
                    .map_err(::std::convert::Into::into)
            }
        }
    };
}

/// Make records usable as nested field values.
#[macro_export]
macro_rules! record_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::codec::FieldValue for $ty {
                fn encode<F: $crate::codec::Format>(
                    &self,
                    cx: &$crate::codec::Context<'_>,
                ) -> ::std::result::Result<F::Value, $crate::codec::CodecError> {
                    $crate::codec::encode_record::<F, Self>(self, cx)
                }

                fn decode<F: $crate::codec::Format>(
                    value: F::Value,
                    cx: &$crate::codec::Context<'_>,
                ) -> ::std::result::Result<Self, $crate::codec::CodecError> {
                    $crate::codec::decode_record::<F, Self>(value, cx)
                }
            }
        )+
    };
}
