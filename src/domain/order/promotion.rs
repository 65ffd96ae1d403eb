use super::entities::Order;
use super::value_objects::PromotionCoupon;

/// What the promotion engine reads from an order when evaluating rules.
pub trait PromotionSubject {
  fn promotion_coupon(&self) -> Option<&PromotionCoupon>;

  /// Amount rules compare thresholds against, in minor units.
  fn promotion_subject_item_total(&self) -> i64;

  fn promotion_subject_item_count(&self) -> usize;
}

impl PromotionSubject for Order {
  // Orders never carry a coupon themselves.
  fn promotion_coupon(&self) -> Option<&PromotionCoupon> {
    None
  }

  fn promotion_subject_item_total(&self) -> i64 {
    self.total()
  }

  fn promotion_subject_item_count(&self) -> usize {
    self.items().len()
  }
}
