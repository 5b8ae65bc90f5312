//! # ユースケース層
//!
//! ハンドラ・ジョブから利用されるアプリケーションサービスを定義する。

pub mod notification;
