//! # テスト用モック
//!
//! ユースケース・ジョブテストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! kigenwatch-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kigenwatch_domain::{
    notification::{EmailMessage, NotificationError},
    product::Product,
    user::{User, UserId},
};

use crate::{
    error::InfraError,
    notification::NotificationSender,
    repository::{NotificationLog, NotificationLogRepository, ProductRepository, UserRepository},
};

// ===== MockUserRepository =====

/// テスト用のインメモリ UserRepository
///
/// `add_user` / `add_product` で事前にデータを投入する。
/// `failing()` で作成すると読み取り操作がすべて失敗する
/// （永続化読み取り失敗時の挙動をテストするため）。
#[derive(Clone, Default)]
pub struct MockUserRepository {
    users:      Arc<Mutex<Vec<User>>>,
    products:   Arc<Mutex<Vec<Product>>>,
    fail_reads: bool,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 読み取り操作がすべて失敗するリポジトリを作成する
    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn add_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    pub fn add_product(&self, product: Product) {
        self.products.lock().unwrap().push(product);
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn insert(&self, user: &User) -> Result<(), InfraError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
        if self.fail_reads {
            return Err(InfraError::unexpected("モック読み取り失敗"));
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id() == id)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, InfraError> {
        if self.fail_reads {
            return Err(InfraError::unexpected("モック読み取り失敗"));
        }
        Ok(self.users.lock().unwrap().clone())
    }

    async fn find_all_with_products(&self) -> Result<Vec<(User, Vec<Product>)>, InfraError> {
        if self.fail_reads {
            return Err(InfraError::unexpected("モック読み取り失敗"));
        }
        let users = self.users.lock().unwrap();
        let products = self.products.lock().unwrap();
        Ok(users
            .iter()
            .map(|user| {
                let owned: Vec<Product> = products
                    .iter()
                    .filter(|p| p.user_id() == user.id())
                    .cloned()
                    .collect();
                (user.clone(), owned)
            })
            .collect())
    }
}

// ===== MockProductRepository =====

/// テスト用のインメモリ ProductRepository
#[derive(Clone, Default)]
pub struct MockProductRepository {
    products: Arc<Mutex<Vec<Product>>>,
}

impl MockProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 挿入済みの商品を取得する（テストの検証用）
    pub fn products(&self) -> Vec<Product> {
        self.products.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductRepository for MockProductRepository {
    async fn insert(&self, product: &Product) -> Result<(), InfraError> {
        self.products.lock().unwrap().push(product.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Product>, InfraError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id() == user_id)
            .cloned()
            .collect())
    }
}

// ===== MockNotificationSender =====

/// テスト用のモック NotificationSender
///
/// 送信したメールを記録する。`fail_for()` で登録した宛先への送信は
/// `SendFailed` を返す（送信失敗の分離をテストするため）。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent:     Arc<Mutex<Vec<EmailMessage>>>,
    fail_for: Arc<Mutex<Vec<String>>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した宛先への送信を失敗させる
    pub fn fail_for(&self, address: impl Into<String>) {
        self.fail_for.lock().unwrap().push(address.into());
    }

    /// 送信されたメールを取得する（テストの検証用）
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        if self.fail_for.lock().unwrap().contains(&email.to) {
            return Err(NotificationError::SendFailed(format!(
                "モック送信失敗: {}",
                email.to
            )));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// ===== MockNotificationLogRepository =====

/// テスト用のインメモリ NotificationLogRepository
#[derive(Clone, Default)]
pub struct MockNotificationLogRepository {
    logs: Arc<Mutex<Vec<NotificationLog>>>,
}

impl MockNotificationLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記録された通知ログを取得する（テストの検証用）
    pub fn logs(&self) -> Vec<NotificationLog> {
        self.logs.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationLogRepository for MockNotificationLogRepository {
    async fn insert(&self, log: &NotificationLog) -> Result<(), InfraError> {
        self.logs.lock().unwrap().push(log.clone());
        Ok(())
    }
}
