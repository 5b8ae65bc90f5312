//! # KigenWatch API ライブラリ
//!
//! API サーバーの設定・ハンドラ・ユースケース・定期ジョブを公開する。
//! バイナリ（`main.rs`）とテストの両方からアクセスできるようにする。

pub mod config;
pub mod error;
pub mod handler;
pub mod job;
pub mod usecase;
