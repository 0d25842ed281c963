//! Deterministic vendor/text category rules.

use crate::extract::rules::patterns::{contains_any, contains_phrase};
use crate::memory::VendorStore;
use crate::models::{CategorizationResult, Category};

use super::{CategoryTier, ClassifyContext};

/// One pattern-to-category pair. Patterns are normalized phrases matched
/// on word boundaries; table order is the priority order.
pub struct CategoryRule {
    pub pattern: &'static str,
    pub category: Category,
}

const fn rule(pattern: &'static str, category: Category) -> CategoryRule {
    CategoryRule { pattern, category }
}

/// Ordered rule table: well-known merchant names first, then unambiguous
/// domain vocabulary. First hit wins.
pub static CATEGORY_RULES: &[CategoryRule] = &[
    // fuel-station brands
    rule("shell", Category::Fuel),
    rule("chevron", Category::Fuel),
    rule("exxon", Category::Fuel),
    rule("mobil", Category::Fuel),
    rule("sunoco", Category::Fuel),
    rule("wawa", Category::Fuel),
    rule("speedway", Category::Fuel),
    rule("marathon", Category::Fuel),
    rule("valero", Category::Fuel),
    rule("citgo", Category::Fuel),
    rule("gas station", Category::Fuel),
    rule("gasoline", Category::Fuel),
    rule("fuel", Category::Fuel),
    rule("unleaded", Category::Fuel),
    rule("diesel", Category::Fuel),
    // restaurant chains and food vocabulary
    rule("starbucks", Category::Meals),
    rule("dunkin", Category::Meals),
    rule("mcdonald", Category::Meals),
    rule("chipotle", Category::Meals),
    rule("subway", Category::Meals),
    rule("restaurant", Category::Meals),
    rule("cafe", Category::Meals),
    rule("coffee", Category::Meals),
    rule("diner", Category::Meals),
    rule("grill", Category::Meals),
    rule("pizza", Category::Meals),
    rule("deli", Category::Meals),
    rule("bar", Category::Meals),
    // hardware chains and building materials
    rule("home depot", Category::Materials),
    rule("lowes", Category::Materials),
    rule("menards", Category::Materials),
    rule("lumber", Category::Materials),
    rule("building materials", Category::Materials),
    rule("drywall", Category::Materials),
    rule("supply", Category::Materials),
    rule("supplies", Category::Materials),
    // tools and equipment
    rule("harbor freight", Category::Tools),
    rule("tool rental", Category::Tools),
    rule("equipment rental", Category::Tools),
    rule("tools", Category::Tools),
    // vehicle maintenance
    rule("jiffy lube", Category::VehicleMaintenance),
    rule("autozone", Category::VehicleMaintenance),
    rule("advance auto", Category::VehicleMaintenance),
    rule("napa auto", Category::VehicleMaintenance),
    rule("oil change", Category::VehicleMaintenance),
    rule("tire", Category::VehicleMaintenance),
    rule("repair", Category::VehicleMaintenance),
    // office / admin
    rule("staples", Category::Office),
    rule("office depot", Category::Office),
    rule("office", Category::Office),
    rule("postage", Category::Office),
    rule("printing", Category::Office),
    // labor and subcontractors
    rule("subcontractor", Category::Subcontractors),
    rule("sub contractor", Category::Subcontractors),
    rule("contracting", Category::Subcontractors),
    rule("labor", Category::Subcontractors),
    // permits, licensing, government fees
    rule("permit", Category::PermitsFees),
    rule("permits", Category::PermitsFees),
    rule("license fee", Category::PermitsFees),
    rule("inspection fee", Category::PermitsFees),
    rule("recording fee", Category::PermitsFees),
    rule("filing fee", Category::PermitsFees),
    rule("township", Category::PermitsFees),
    rule("borough", Category::PermitsFees),
    rule("county clerk", Category::PermitsFees),
    rule("fees", Category::PermitsFees),
    rule("fee", Category::PermitsFees),
];

/// Payment/tax boilerplate that must not trigger the fee rules: the word
/// "fee" inside a card-processing footer is not a permit.
const FEE_GUARD_VOCAB: &[&str] = &[
    "card",
    "credit",
    "debit",
    "visa",
    "mastercard",
    "amex",
    "discover",
    "processing",
    "surcharge",
    "convenience",
    "auth",
    "tax",
];

fn suppressed(rule: &CategoryRule, norm_line: &str) -> bool {
    rule.category == Category::PermitsFees && contains_any(norm_line, FEE_GUARD_VOCAB)
}

/// Tier 2: the deterministic rule table, vendor string first (stronger),
/// then the receipt text (weaker).
pub struct RuleTier;

impl CategoryTier for RuleTier {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn classify(
        &self,
        ctx: &ClassifyContext,
        _memory: &dyn VendorStore,
    ) -> Option<CategorizationResult> {
        if !ctx.vendor_norm.is_empty() {
            for rule in CATEGORY_RULES {
                if contains_phrase(&ctx.vendor_norm, rule.pattern)
                    && !suppressed(rule, &ctx.vendor_norm)
                {
                    return Some(hit(rule, 0.90, format!("Vendor matched '{}'", rule.pattern)));
                }
            }
        }

        for rule in CATEGORY_RULES {
            if let Some(line) = ctx
                .lines
                .iter()
                .find(|line| contains_phrase(line, rule.pattern))
            {
                if suppressed(rule, line) {
                    continue;
                }
                return Some(hit(
                    rule,
                    0.80,
                    format!("Receipt text matched '{}'", rule.pattern),
                ));
            }
        }

        None
    }
}

fn hit(rule: &CategoryRule, confidence: f32, reason: String) -> CategorizationResult {
    CategorizationResult {
        category: rule.category,
        confidence,
        reasons: vec![reason, "Will auto-approve after first review".to_string()],
        from_memory: false,
    }
}
