//! Standard UK weather-symbol configuration.
//!
//! Codes:
//!    0/1 clear night/sunny day       2/3 partly cloudy night/day
//!    4 dust    5 mist    6 fog    7 cloudy    8 overcast
//!    9/10 light shower    11 drizzle    12 light rain
//!   13/14 heavy shower    15 heavy rain
//!   16/17 sleet shower    18 sleet
//!   19/20 hail shower     21 hail
//!   22/23 light snow shower    24 light snow
//!   25/26 heavy snow shower    27 heavy snow
//!   28/29 thunder shower       30 thunder
//!
//! Showers carry partly cloudy skies (3); continuous precipitation carries
//! overcast (8).

use crate::decision_tree::{DecisionTree, Leaf};
use crate::modal::{ModalConfig, ModalParams};
use crate::selection::{BroadCategories, GroupDefinitionSet};

const PARTLY_CLOUDY: u8 = 3;
const OVERCAST: u8 = 8;

pub fn uk_leaves() -> Vec<Leaf> {
    let mut leaves = vec![
        Leaf::new(1).with_night(0),
        Leaf::new(3).with_night(2),
        Leaf::new(4),
        Leaf::new(5),
        Leaf::new(6),
        Leaf::new(7),
        Leaf::new(8),
        Leaf::new(11).with_cloud(OVERCAST),
        Leaf::new(12).with_cloud(OVERCAST),
    ];
    // (shower day code, continuous code): shower night form is day - 1.
    for (shower, continuous) in [(14, 15), (17, 18), (20, 21), (26, 27), (29, 30)] {
        leaves.push(Leaf::new(shower).with_night(shower - 1).with_cloud(PARTLY_CLOUDY));
        leaves.push(Leaf::new(continuous).with_cloud(OVERCAST));
    }
    leaves.push(Leaf::new(10).with_night(9).with_cloud(PARTLY_CLOUDY));
    leaves.push(Leaf::new(23).with_night(22).with_cloud(PARTLY_CLOUDY));
    leaves.push(Leaf::new(24).with_cloud(OVERCAST));
    leaves.sort_by_key(|l| l.code);
    leaves
}

pub fn uk_tree() -> DecisionTree {
    DecisionTree::new(uk_leaves()).expect("built-in UK leaves are consistent")
}

pub fn uk_broad_categories() -> BroadCategories {
    BroadCategories::new(
        vec![10, 11, 12, 14, 15, 17, 18, 20, 21, 23, 24, 26, 27, 29, 30],
        vec![1, 3, 4, 5, 6, 7, 8],
    )
    .expect("built-in UK categories are disjoint")
}

/// Wet sub-categories, most significant first.
pub fn uk_wet_groups() -> GroupDefinitionSet {
    GroupDefinitionSet::from_pairs([
        ("extreme_convection", vec![30, 29, 21, 20]),
        ("frozen", vec![27, 26, 24, 23, 18, 17]),
        ("liquid", vec![15, 14, 12, 11, 10]),
    ])
}

/// Intensity variants of one phenomenon, preferred variant first.
pub fn uk_intensity_groups() -> GroupDefinitionSet {
    GroupDefinitionSet::from_pairs([
        ("rain_shower", vec![14, 10]),
        ("rain", vec![15, 12]),
        ("snow_shower", vec![26, 23]),
        ("snow", vec![27, 24]),
        ("thunder", vec![30, 29]),
        ("cloud", vec![7, 8]),
        ("sun", vec![3, 1]),
        ("vis", vec![5, 6]),
    ])
}

/// Full UK configuration. Intensity consolidation is off by default.
pub fn uk_config() -> ModalConfig {
    ModalConfig {
        decision_tree: uk_tree(),
        broad_categories: uk_broad_categories(),
        wet_groups: Some(uk_wet_groups()),
        dry_groups: None,
        intensity_groups: None,
        params: ModalParams::default(),
    }
}
