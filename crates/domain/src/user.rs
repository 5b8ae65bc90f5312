//! # ユーザー
//!
//! ユーザーエンティティとそれに関連する値オブジェクトを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 役割 |
//! |---|------------|------|
//! | [`User`] | ユーザー | 商品の所有者。期限通知メールの宛先 |
//! | [`Email`] | メールアドレス | 通知の送信先。生成時にバリデーション |
//! | [`UserName`] | ユーザー名 | 表示名。PII のため Debug 出力はマスク |
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: UserId は UUID をラップし、型安全性を確保
//! - **不変性**: エンティティフィールドは不変（現スコープでは更新・削除なし）
//! - **バリデーション**: 値オブジェクトの生成時に検証ロジックを実行
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use kigenwatch_domain::user::{Email, User, UserId, UserName};
//!
//! let user = User::new(
//!     UserId::new(),
//!     Email::new("user@example.com")?,
//!     UserName::new("山田太郎")?,
//!     chrono::Utc::now(),
//! );
//!
//! assert_eq!(user.email().as_str(), "user@example.com");
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};

use crate::DomainError;

define_uuid_id! {
    /// ユーザー ID（一意識別子）
    ///
    /// UUID v7 を使用し、生成順にソート可能。
    /// Newtype パターンで型安全性を確保。
    pub struct UserId;
}

/// メールアドレス（値オブジェクト）
///
/// 生成時にバリデーションを実行し、不正な値の作成を防ぐ。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `local@domain` の形式である
    /// - 最大 255 文字
    ///
    /// # エラー
    ///
    /// バリデーションに失敗した場合は `DomainError::Validation` を返す。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスは必須です".to_string(),
            ));
        }

        // 基本的な構造検証: local@domain の形式であること
        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        };

        if local.is_empty() || domain.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        }

        if value.len() > 255 {
            return Err(DomainError::Validation(
                "メールアドレスは255文字以内である必要があります".to_string(),
            ));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 所有権を持つ文字列に変換する
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

define_validated_string! {
    /// ユーザー名（値オブジェクト）
    ///
    /// trim 後に空でないこと、100 文字以内であることを要求する。
    /// PII のため Debug 出力は `[REDACTED]` にマスクされる。
    pub struct UserName {
        label: "ユーザー名",
        max_length: 100,
        pii: true,
    }
}

/// ユーザーエンティティ
///
/// 商品の所有者を表現する。期限スキャンはユーザー単位で商品を集約し、
/// このエンティティのメールアドレスへ通知を送信する。
///
/// # 不変条件
///
/// - 現スコープでは作成後の更新・削除は行わない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id:         UserId,
    email:      Email,
    name:       UserName,
    created_at: DateTime<Utc>,
}

impl User {
    /// 新しいユーザーを作成する
    ///
    /// # 引数
    ///
    /// - `id`: ユーザー ID
    /// - `email`: メールアドレス（通知の宛先）
    /// - `name`: 表示名
    /// - `now`: 現在日時（呼び出し元から注入）
    pub fn new(id: UserId, email: Email, name: UserName, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email,
            name,
            created_at: now,
        }
    }

    /// 既存のデータからユーザーを復元する（データベースから取得時）
    pub fn from_db(
        id: UserId,
        email: Email,
        name: UserName,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            created_at,
        }
    }

    // Getter メソッド

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
