/// 数据库中的文本值无法映射到枚举
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// 以文本形式存储的枚举：serde 与数据库使用同一组字面量
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err($crate::models::UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

mod application;
mod favorite;
mod message;
mod pet;
mod shelter;

pub use application::{Application, ApplicationStatus, NewApplication};
pub use favorite::FavoriteMark;
pub use message::{
    APPLICATION_SUBMITTED_TITLE, Message, MessageKind, NewMessage, application_submitted_content,
};
pub use pet::{Category, Gender, NewPet, Pet, PetStatus};
pub use shelter::{Shelter, UNKNOWN_SHELTER_NAME};
