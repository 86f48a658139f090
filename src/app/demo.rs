use crate::domain::model::{CanonicalList, Identifier, LoadedLists};

const SAMPLE_FOLLOWERS: [&str; 13] = [
    "ali_dev",
    "sara_design",
    "reza_code",
    "mina_art",
    "hossein_js",
    "nazanin_ui",
    "mehdi_php",
    "fatemeh_css",
    "amir_react",
    "zahra_vue",
    "fan_only_1",
    "fan_only_2",
    "fan_only_3",
];

const SAMPLE_FOLLOWING: [&str; 13] = [
    "ali_dev",
    "sara_design",
    "reza_code",
    "mina_art",
    "hossein_js",
    "nazanin_ui",
    "mehdi_php",
    "fatemeh_css",
    "unfollower_1",
    "unfollower_2",
    "unfollower_3",
    "unfollower_4",
    "unfollower_5",
];

fn to_list(names: &[&str]) -> CanonicalList {
    names.iter().filter_map(|name| Identifier::parse(name)).collect()
}

/// Fixed sample data: 8 mutuals, 5 not following back, 5 fans.
pub fn sample_lists() -> LoadedLists {
    LoadedLists {
        followers: to_list(&SAMPLE_FOLLOWERS),
        following: to_list(&SAMPLE_FOLLOWING),
    }
}
