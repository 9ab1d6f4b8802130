use serde::{Deserialize, Serialize};

/// Number of elements carried by the elemental chart.
pub const ELEMENT_COUNT: usize = 8;

/// Elemental affinity carried by attacks and by attackers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    /// Neutral affinity with no advantages.
    None,
    /// Light affinity, strong against dark.
    Light,
    /// Dark affinity, strong against light.
    Dark,
    /// Water affinity, strong against fire.
    Water,
    /// Fire affinity, strong against wind.
    Fire,
    /// Wind affinity, strong against earth.
    Wind,
    /// Earth affinity, strong against water.
    Earth,
    /// Poison affinity, immune to itself.
    Poison,
}

impl Element {
    /// Every element in chart order.
    pub const ALL: [Element; ELEMENT_COUNT] = [
        Element::None,
        Element::Light,
        Element::Dark,
        Element::Water,
        Element::Fire,
        Element::Wind,
        Element::Earth,
        Element::Poison,
    ];

    /// Zero-based position of the element within [`Element::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Element::None => 0,
            Element::Light => 1,
            Element::Dark => 2,
            Element::Water => 3,
            Element::Fire => 4,
            Element::Wind => 5,
            Element::Earth => 6,
            Element::Poison => 7,
        }
    }

    /// Element at the provided chart position, wrapping past the end.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % ELEMENT_COUNT]
    }

    /// Human-readable element name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Element::None => "none",
            Element::Light => "light",
            Element::Dark => "dark",
            Element::Water => "water",
            Element::Fire => "fire",
            Element::Wind => "wind",
            Element::Earth => "earth",
            Element::Poison => "poison",
        }
    }
}

// Rows are the attacking element, columns the defending element.
const CHART: [[f64; ELEMENT_COUNT]; ELEMENT_COUNT] = [
    // none
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
    // light
    [1.0, 0.5, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0],
    // dark
    [1.0, 2.0, 0.5, 1.0, 1.0, 1.0, 1.0, 1.0],
    // water
    [1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 0.5, 1.0],
    // fire
    [1.0, 1.0, 1.0, 0.5, 1.0, 2.0, 1.0, 1.5],
    // wind
    [1.0, 1.0, 1.0, 1.0, 0.5, 1.0, 2.0, 1.5],
    // earth
    [1.0, 1.0, 1.0, 2.0, 1.0, 0.5, 1.0, 1.0],
    // poison
    [1.0, 1.0, 1.0, 1.5, 1.0, 1.0, 1.5, 0.0],
];

/// Damage multiplier applied when `attack` strikes a single `defend` element.
#[must_use]
pub const fn multiplier(attack: Element, defend: Element) -> f64 {
    CHART[attack.index()][defend.index()]
}

/// Product of [`multiplier`] over every element carried by the defender.
///
/// The product is never clamped, so two favourable elements compound to 4.0
/// and an immune element zeroes the hit.
#[must_use]
pub fn combined_multiplier(attack: Element, defend: &ElementSet) -> f64 {
    defend
        .iter()
        .fold(1.0, |product, element| product * multiplier(attack, element))
}

/// Non-empty set of one or two elements carried by an attacker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementSet {
    primary: Element,
    secondary: Option<Element>,
}

impl ElementSet {
    /// Creates a set holding a single element.
    #[must_use]
    pub const fn single(element: Element) -> Self {
        Self {
            primary: element,
            secondary: None,
        }
    }

    /// Creates a set holding two elements.
    #[must_use]
    pub const fn pair(primary: Element, secondary: Element) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }

    /// Element used for display and legacy single-element lookups.
    #[must_use]
    pub const fn primary(&self) -> Element {
        self.primary
    }

    /// Optional second element.
    #[must_use]
    pub const fn secondary(&self) -> Option<Element> {
        self.secondary
    }

    /// Number of elements carried, either one or two.
    #[must_use]
    pub const fn len(&self) -> usize {
        if self.secondary.is_some() {
            2
        } else {
            1
        }
    }

    /// Always false; sets hold at least one element.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterates the carried elements in order.
    pub fn iter(&self) -> impl Iterator<Item = Element> {
        std::iter::once(self.primary).chain(self.secondary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn chart_matches_authored_relationships() {
        assert_eq!(multiplier(Element::Water, Element::Fire), 2.0);
        assert_eq!(multiplier(Element::Fire, Element::Water), 0.5);
        assert_eq!(multiplier(Element::Fire, Element::Wind), 2.0);
        assert_eq!(multiplier(Element::Wind, Element::Fire), 0.5);
        assert_eq!(multiplier(Element::Wind, Element::Earth), 2.0);
        assert_eq!(multiplier(Element::Earth, Element::Wind), 0.5);
        assert_eq!(multiplier(Element::Earth, Element::Water), 2.0);
        assert_eq!(multiplier(Element::Water, Element::Earth), 0.5);
        assert_eq!(multiplier(Element::Light, Element::Dark), 2.0);
        assert_eq!(multiplier(Element::Dark, Element::Light), 2.0);
        assert_eq!(multiplier(Element::Light, Element::Light), 0.5);
        assert_eq!(multiplier(Element::Dark, Element::Dark), 0.5);
        assert_eq!(multiplier(Element::Poison, Element::Earth), 1.5);
        assert_eq!(multiplier(Element::Poison, Element::Water), 1.5);
        assert_eq!(multiplier(Element::Poison, Element::Poison), 0.0);
        assert_eq!(multiplier(Element::Fire, Element::Poison), 1.5);
        assert_eq!(multiplier(Element::Wind, Element::Poison), 1.5);
        assert_eq!(multiplier(Element::None, Element::Poison), 1.0);
        assert_eq!(multiplier(Element::Water, Element::Poison), 1.0);
    }

    #[test]
    fn neutral_attacks_are_never_modified() {
        for defend in Element::ALL {
            assert_eq!(multiplier(Element::None, defend), 1.0);
            assert_eq!(multiplier(defend, Element::None), 1.0);
        }
    }

    #[test]
    fn double_advantage_compounds_past_four() {
        let set = ElementSet::pair(Element::Light, Element::Light);
        assert_eq!(combined_multiplier(Element::Dark, &set), 4.0);

        let immune = ElementSet::pair(Element::Water, Element::Poison);
        assert_eq!(combined_multiplier(Element::Poison, &immune), 0.0);
    }

    #[test]
    fn index_round_trips_through_chart_order() {
        for (position, element) in Element::ALL.into_iter().enumerate() {
            assert_eq!(element.index(), position);
            assert_eq!(Element::from_index(position), element);
        }
        assert_eq!(Element::from_index(ELEMENT_COUNT + 3), Element::Water);
    }

    fn any_element() -> impl Strategy<Value = Element> {
        (0..ELEMENT_COUNT).prop_map(Element::from_index)
    }

    proptest! {
        #[test]
        fn two_element_multiplier_is_exact_product(
            attack in any_element(),
            first in any_element(),
            second in any_element(),
        ) {
            let set = ElementSet::pair(first, second);
            prop_assert_eq!(
                combined_multiplier(attack, &set),
                multiplier(attack, first) * multiplier(attack, second)
            );
            prop_assert_eq!(set.len(), 2);
        }

        #[test]
        fn single_element_set_matches_chart(attack in any_element(), defend in any_element()) {
            let set = ElementSet::single(defend);
            prop_assert_eq!(combined_multiplier(attack, &set), multiplier(attack, defend));
        }
    }
}
