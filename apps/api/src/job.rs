//! # 定期ジョブ
//!
//! バックグラウンドで周期実行されるジョブを定義する。
//!
//! ジョブは次のパターンに従う:
//!
//! 1. 1 回分の処理を行う `run()` メソッド（結果サマリを返す）
//! 2. `run()` を周期実行するワーカー関数（`start_*_worker`）
//! 3. サマリ・エラーの構造化ログ出力

pub mod expiry_check;

pub use expiry_check::{ExpiryCheckJob, ExpiryCheckRunResult, start_expiry_check_worker};
