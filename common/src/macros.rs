/// Implements `as_str`, `Display` and `FromStr` for a fieldless enum using
/// the given wire names. Parsing is case-insensitive and fails with
/// `Error::InvalidInput`.
#[macro_export]
macro_rules! impl_str_conversions_for_enum {
    ($enum_name:ident, $( $variant:ident => $text:literal ),+ $(,)?) => {
        impl $enum_name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $enum_name::$variant => $text, )+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::Error;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $( $text => Ok($enum_name::$variant), )+
                    _ => Err($crate::Error::InvalidInput(format!(
                        "unknown {} '{}'",
                        stringify!($enum_name).to_lowercase(),
                        s
                    ))),
                }
            }
        }
    };
}
