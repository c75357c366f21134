//! tally-core: data model and pure analytics for the Tally spending dashboard

pub mod finance;
pub mod insights;
pub mod palette;
pub mod period;
pub mod projection;
pub mod proportion;
pub mod time;

pub use finance::{
    Budget, CategorySlice, DatedCategoryTotal, DatedTotal, MerchantStat, PeriodSummary, Receipt,
    SpendingGoal, UNCATEGORIZED,
};
pub use insights::{Comparison, Direction, MerchantTotal};
pub use palette::{CategoryColor, category_color};
pub use period::{
    OffsetBounds, PeriodKind, PeriodNavigator, PeriodSelection, PeriodWindow,
    compute_offset_bounds, period_label, resolve_window,
};
pub use projection::{
    BudgetProgress, GoalProgress, ProjectionResult, SpendStatus, budget_progress, classify,
    goal_progress, project, top_budgets,
};
pub use proportion::{GradientStop, Share, build_gradient_stops, build_shares, share_at};

/// Keyword rules that assign a store to a spending category
pub mod categorizer {
    /// Where a category decision came from
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum RuleSource {
        MerchantRule,
        KeywordRule,
        Default,
    }

    /// Categorization result
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CategoryResult {
        pub category: &'static str,
        pub source: RuleSource,
    }

    const KNOWN_MERCHANTS: &[(&str, &str)] = &[
        ("trader joe", "Food & Drink"),
        ("whole foods", "Food & Drink"),
        ("stop shop", "Food & Drink"),
        ("starbucks", "Food & Drink"),
        ("dunkin", "Food & Drink"),
        ("panera", "Food & Drink"),
        ("chipotle", "Food & Drink"),
        ("mcdonald", "Food & Drink"),
        ("sweetgreen", "Food & Drink"),
        ("subway", "Food & Drink"),
        ("amazon", "Shopping"),
        ("target", "Shopping"),
        ("walmart", "Shopping"),
        ("costco", "Shopping"),
        ("best buy", "Shopping"),
        ("urban outfitter", "Shopping"),
        ("uniqlo", "Shopping"),
        ("nike", "Shopping"),
        ("sephora", "Shopping"),
        ("home depot", "Shopping"),
        ("amc", "Entertainment"),
        ("netflix", "Entertainment"),
        ("spotify", "Entertainment"),
        ("shell", "Transportation"),
        ("exxon", "Transportation"),
        ("uber", "Transportation"),
        ("lyft", "Transportation"),
        ("cvs", "Health"),
        ("walgreens", "Health"),
        ("planet fitness", "Health"),
        ("equinox", "Health"),
        ("marriott", "Travel"),
        ("airbnb", "Travel"),
        ("delta", "Travel"),
        ("jetblue", "Travel"),
        ("hilton", "Travel"),
        ("comcast", "Services"),
        ("xfinity", "Services"),
        ("verizon", "Services"),
        ("national grid", "Services"),
    ];

    const SUBSCRIPTION_MERCHANTS: &[&str] = &[
        "netflix",
        "spotify",
        "hulu",
        "disney+",
        "planet fitness",
        "equinox",
        "boston sports club",
        "cambridge athletic",
        "comcast",
        "xfinity",
        "verizon",
        "national grid",
        "blue cross",
        "bright horizons",
    ];

    /// (category, strong keywords, moderate keywords)
    const SIGNALS: &[(&str, &[&str], &[&str])] = &[
        (
            "Food & Drink",
            &["restaurant", "cafe", "coffee", "bakery", "pizzeria", "grocer", "market"],
            &["pizza", "sushi", "grill", "kitchen", "diner", "bar", "pub", "seafood", "deli"],
        ),
        (
            "Shopping",
            &["mall", "outlet", "department store", "boutique"],
            &["shop", "store", "fashion", "book", "sport", "tech", "pet"],
        ),
        (
            "Entertainment",
            &["cinema", "theater", "theatre", "stadium", "arena"],
            &["movie", "concert", "ticket", "arcade", "museum", "music"],
        ),
        (
            "Transportation",
            &["gas station", "fuel", "auto repair", "transit authority"],
            &["gas", "parking", "metro", "transit", "taxi", "auto"],
        ),
        (
            "Health",
            &["pharmacy", "hospital", "clinic", "medical center", "dental"],
            &["health", "fitness", "gym", "yoga", "athletic", "wellness", "vitamin"],
        ),
        (
            "Travel",
            &["hotel", "resort", "airline", "airways"],
            &["travel", "flight", "booking", "rental car", "cruise"],
        ),
        (
            "Services",
            &["utility", "insurance", "electric company"],
            &["internet", "cable", "electric", "daycare", "school", "salon"],
        ),
    ];

    const STRONG_WEIGHT: u32 = 3;
    const MODERATE_WEIGHT: u32 = 1;

    /// Categorize a store name. Known merchants win, then the best keyword
    /// score; unmatched names fall back to "Shopping".
    pub fn categorize_store(store_name: &str) -> CategoryResult {
        let name = store_name.trim().to_lowercase();

        if let Some((_, category)) = KNOWN_MERCHANTS.iter().find(|(m, _)| name.contains(m)) {
            return CategoryResult { category: *category, source: RuleSource::MerchantRule };
        }

        let mut best: Option<(&'static str, u32)> = None;
        for (category, strong, moderate) in SIGNALS {
            let score = strong.iter().filter(|k| name.contains(*k)).count() as u32 * STRONG_WEIGHT
                + moderate.iter().filter(|k| name.contains(*k)).count() as u32 * MODERATE_WEIGHT;
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((*category, score));
            }
        }

        match best {
            Some((category, _)) => CategoryResult { category, source: RuleSource::KeywordRule },
            None => CategoryResult { category: "Shopping", source: RuleSource::Default },
        }
    }

    /// True for known recurring services (streaming, gyms, utilities).
    pub fn is_subscription_merchant(store_name: &str) -> bool {
        let name = store_name.trim().to_lowercase();
        SUBSCRIPTION_MERCHANTS.iter().any(|k| name.contains(k))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_known_merchant() {
            let r = categorize_store("Trader Joe's #512");
            assert_eq!(r.category, "Food & Drink");
            assert_eq!(r.source, RuleSource::MerchantRule);
        }

        #[test]
        fn test_strong_keyword() {
            let r = categorize_store("Harbor View Hotel");
            assert_eq!(r.category, "Travel");
            assert_eq!(r.source, RuleSource::KeywordRule);
        }

        #[test]
        fn test_moderate_keyword_still_wins_over_default() {
            let r = categorize_store("Downtown Parking Garage");
            assert_eq!(r.category, "Transportation");
            assert_eq!(r.source, RuleSource::KeywordRule);
        }

        #[test]
        fn test_scores_accumulate() {
            // "clinic" (strong) beats "shop" (moderate)
            let r = categorize_store("Family Clinic Gift Shop");
            assert_eq!(r.category, "Health");
        }

        #[test]
        fn test_default_category() {
            let r = categorize_store("Zq Holdings");
            assert_eq!(r.category, "Shopping");
            assert_eq!(r.source, RuleSource::Default);
        }

        #[test]
        fn test_subscription_detection() {
            assert!(is_subscription_merchant("NETFLIX.COM"));
            assert!(is_subscription_merchant("Planet Fitness Cambridge"));
            assert!(!is_subscription_merchant("Costco"));
        }
    }
}

pub use categorizer::{CategoryResult, categorize_store, is_subscription_merchant};
