pub mod feature;
pub mod font;
pub mod parsers;
pub mod settings;
pub mod text;

pub use feature::{parse_feature_list, OpenTypeFeature};
pub use font::{FontFamilyId, FontStyle, FontWeight};
pub use parsers::StyleParseError;
pub use settings::{ColorSetting, SettingKind, TypesettingSettings};
pub use text::{HorizontalAlignment, Hyperlink};
