/// Declare an open code enum: an integer in the binary form, a name in
/// text. Codes outside the listed set are kept as `Other`, and travel as
/// bare integers in both forms.
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident = $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident = ($code:literal, $text:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
            Other(u64),
        }

        impl $name {
            #[must_use]
            pub const fn code(self) -> u64 {
                match self {
                    $( Self::$variant => $code, )+
                    Self::Other(code) => code,
                }
            }

            #[must_use]
            pub const fn from_code(code: u64) -> Self {
                match code {
                    $( $code => Self::$variant, )+
                    other => Self::Other(other),
                }
            }

            #[must_use]
            pub const fn name(self) -> Option<&'static str> {
                match self {
                    $( Self::$variant => Some($text), )+
                    Self::Other(_) => None,
                }
            }

            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $text => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self.name() {
                    Some(name) => f.write_str(name),
                    None => write!(f, "{}({})", $label, self.code()),
                }
            }
        }

        impl ::corim_core::codec::FieldValue for $name {
            fn encode<F: ::corim_core::codec::Format>(
                &self,
                _cx: &::corim_core::codec::Context<'_>,
            ) -> Result<F::Value, ::corim_core::codec::CodecError> {
                match (F::KIND, self.name()) {
                    (::corim_core::codec::WireFormat::Json, Some(name)) => F::to_value(&name),
                    _ => F::to_value(&self.code()),
                }
            }

            fn decode<F: ::corim_core::codec::Format>(
                value: F::Value,
                _cx: &::corim_core::codec::Context<'_>,
            ) -> Result<Self, ::corim_core::codec::CodecError> {
                if F::KIND == ::corim_core::codec::WireFormat::Json {
                    if let Ok(name) = F::from_value::<String>(value.clone()) {
                        return Self::from_name(&name).ok_or_else(|| {
                            ::corim_core::codec::CodecError::Scalar(format!(
                                "unknown {}: {name:?}",
                                $label
                            ))
                        });
                    }
                }

                F::from_value::<u64>(value).map(Self::from_code)
            }
        }
    };
}
