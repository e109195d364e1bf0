/// Declare a closed enum whose wire form is a snake_case string.
///
/// Expands to the enum itself (with the usual value derives and
/// `#[serde(into = "String", try_from = "String")]`, so it also works as a JSON
/// map key) plus `ALL`, `as_str`, `Display`, `FromStr` and the two `String`
/// conversions. Unknown strings are rejected.
macro_rules! string_enum {
    (@conversions $name:ident) => {
        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> Self {
                v.as_str().to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $str:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(into = "String", try_from = "String")]
        $vis enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $str,)+
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($str => Ok($name::$variant),)+
                    other => Err(format!("unknown {}: {other}", stringify!($name))),
                }
            }
        }

        string_enum!(@conversions $name);
    };
}

/// Like [`string_enum!`] but open: a trailing `Custom(String)` variant holds
/// any tag not in the named list. `NAMED` lists the named variants. Only the
/// empty string is rejected, with `$label` in the message. Comparison goes by
/// tag, so `Custom("food")` equals the `Food` variant.
macro_rules! open_string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($label:literal) {
            $($(#[$vmeta:meta])* $variant:ident => $str:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(into = "String", try_from = "String")]
        $vis enum $name {
            $($(#[$vmeta])* $variant,)+
            Custom(String),
        }

        impl $name {
            pub const NAMED: &'static [$name] = &[$($name::$variant,)+];

            /// Build from a tag, preferring the named variant when one matches.
            pub fn custom(tag: impl Into<String>) -> Self {
                let tag = tag.into();
                match $name::NAMED.iter().find(|n| n.as_str() == tag) {
                    Some(named) => named.clone(),
                    None => $name::Custom(tag),
                }
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $str,)+
                    $name::Custom(s) => s,
                }
            }

            // A `Custom` holding a named tag is the same value as that variant.
            fn canonical(&self) -> (usize, &str) {
                let tag = self.as_str();
                match $name::NAMED.iter().position(|n| n.as_str() == tag) {
                    Some(rank) => (rank, ""),
                    None => ($name::NAMED.len(), tag),
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.canonical() == other.canonical()
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<::std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> ::std::cmp::Ordering {
                self.canonical().cmp(&other.canonical())
            }
        }

        impl ::std::hash::Hash for $name {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                self.canonical().hash(state);
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($str => Ok($name::$variant),)+
                    "" => Err(format!("{} cannot be empty", $label)),
                    other => Ok($name::Custom(other.to_string())),
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> Self {
                match v {
                    $name::Custom(s) => s,
                    named => named.as_str().to_string(),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }
    };
}
