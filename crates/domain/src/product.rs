//! # 商品
//!
//! 商品エンティティと期限判定ロジックを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 役割 |
//! |---|------------|------|
//! | [`Product`] | 商品 | 期限日時を持ち、一人のユーザーに属する |
//! | [`ProductName`] | 商品名 | 通知メールの本文に表示される |
//!
//! ## 期限判定
//!
//! 残り日数は `(expiry_at - now)` の丸め（四捨五入）ではなく
//! ゼロ方向への切り捨てで算出する。残り 3 日以下（期限切れ済み、
//! つまり負の値を含む）の商品が通知対象になる。

use chrono::{DateTime, Utc};

use crate::user::UserId;

/// 通知対象とみなす残り日数のしきい値（この値以下で通知）
pub const EXPIRY_WARNING_DAYS: i64 = 3;

define_uuid_id! {
    /// 商品 ID（一意識別子）
    ///
    /// UUID v7 を使用し、生成順にソート可能。
    pub struct ProductId;
}

define_validated_string! {
    /// 商品名（値オブジェクト）
    ///
    /// trim 後に空でないこと、100 文字以内であることを要求する。
    pub struct ProductName {
        label: "商品名",
        max_length: 100,
    }
}

/// 商品エンティティ
///
/// 期限日時を持つ商品を表現する。必ず一人のユーザーに属する（多対一）。
///
/// # 不変条件
///
/// - `user_id` は作成時点で存在するユーザーを指す
/// - 現スコープでは作成後の更新・削除は行わない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id:         ProductId,
    user_id:    UserId,
    name:       ProductName,
    expiry_at:  DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl Product {
    /// 新しい商品を作成する
    ///
    /// # 引数
    ///
    /// - `id`: 商品 ID
    /// - `user_id`: 所有ユーザーの ID（存在確認は呼び出し元の責務）
    /// - `name`: 商品名
    /// - `expiry_at`: 期限日時
    /// - `now`: 現在日時（呼び出し元から注入）
    pub fn new(
        id: ProductId,
        user_id: UserId,
        name: ProductName,
        expiry_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            expiry_at,
            created_at: now,
        }
    }

    /// 既存のデータから商品を復元する（データベースから取得時）
    pub fn from_db(
        id: ProductId,
        user_id: UserId,
        name: ProductName,
        expiry_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            expiry_at,
            created_at,
        }
    }

    // Getter メソッド

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn name(&self) -> &ProductName {
        &self.name
    }

    pub fn expiry_at(&self) -> DateTime<Utc> {
        self.expiry_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // ビジネスロジックメソッド

    /// 基準時刻からの残り日数を算出する
    ///
    /// `chrono::TimeDelta::num_days` による丸めなしのゼロ方向切り捨て。
    /// 期限を過ぎている場合は負の値を返す（例: 36 時間経過 → -1）。
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        (self.expiry_at - now).num_days()
    }

    /// 通知対象（期限切れ間近または期限切れ済み）か判定する
    ///
    /// 残り日数が [`EXPIRY_WARNING_DAYS`] 以下の場合に true を返す。
    pub fn is_expiring(&self, now: DateTime<Utc>) -> bool {
        self.days_until_expiry(now) <= EXPIRY_WARNING_DAYS
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use super::*;

    // フィクスチャ

    /// テスト用の固定タイムスタンプ
    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn product_expiring_at(expiry_at: DateTime<Utc>, now: DateTime<Utc>) -> Product {
        Product::new(
            ProductId::new(),
            UserId::new(),
            ProductName::new("牛乳").unwrap(),
            expiry_at,
            now,
        )
    }

    // ProductName のテスト

    #[test]
    fn test_商品名は空文字列を拒否する() {
        assert!(ProductName::new("").is_err());
    }

    #[test]
    fn test_商品名は100文字以内を受け入れる() {
        assert!(ProductName::new("あ".repeat(100)).is_ok());
        assert!(ProductName::new("あ".repeat(101)).is_err());
    }

    // days_until_expiry のテスト（ゼロ方向切り捨て）

    #[rstest]
    #[case(TimeDelta::days(2), 2, "ちょうど2日")]
    #[case(TimeDelta::days(3) + TimeDelta::hours(1), 3, "3日+1時間は切り捨てて3")]
    #[case(TimeDelta::days(4) - TimeDelta::seconds(1), 3, "4日-1秒は切り捨てて3")]
    #[case(TimeDelta::days(4), 4, "ちょうど4日")]
    #[case(TimeDelta::hours(12), 0, "12時間は0日")]
    #[case(TimeDelta::zero(), 0, "ちょうど今")]
    #[case(-TimeDelta::hours(36), -1, "36時間経過はゼロ方向切り捨てで-1")]
    #[case(-TimeDelta::days(10), -10, "10日経過")]
    fn test_残り日数はゼロ方向に切り捨てる(
        now: DateTime<Utc>,
        #[case] offset: TimeDelta,
        #[case] expected: i64,
        #[case] _reason: &str,
    ) {
        let product = product_expiring_at(now + offset, now);
        assert_eq!(product.days_until_expiry(now), expected);
    }

    // is_expiring のテスト（しきい値 3 日）

    #[rstest]
    #[case(TimeDelta::days(2), true, "残り2日は通知対象")]
    #[case(TimeDelta::days(3), true, "残り3日（境界）は通知対象")]
    #[case(TimeDelta::days(3) + TimeDelta::hours(23), true, "切り捨てて3日なら通知対象")]
    #[case(TimeDelta::days(4), false, "残り4日は対象外")]
    #[case(TimeDelta::days(10), false, "残り10日は対象外")]
    #[case(TimeDelta::zero(), true, "ちょうど期限は通知対象")]
    #[case(-TimeDelta::days(1), true, "期限切れ済みも通知対象")]
    fn test_通知対象の判定(
        now: DateTime<Utc>,
        #[case] offset: TimeDelta,
        #[case] expected: bool,
        #[case] _reason: &str,
    ) {
        let product = product_expiring_at(now + offset, now);
        assert_eq!(product.is_expiring(now), expected);
    }

    // Product のテスト

    #[rstest]
    fn test_from_dbで復元した商品は元と等しい(now: DateTime<Utc>) {
        let product = product_expiring_at(now + TimeDelta::days(2), now);
        let restored = Product::from_db(
            product.id().clone(),
            product.user_id().clone(),
            product.name().clone(),
            product.expiry_at(),
            product.created_at(),
        );
        assert_eq!(restored, product);
    }
}
