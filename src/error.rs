//! ## `error`
//! 収束加速と連分数の評価で呼び出し側に伝えるエラー

use thiserror::Error;

/// 級数の和を求める際のエラー
#[derive(Error,Debug,Clone,PartialEq,Eq)]
pub enum SummationError {
	/// 変換に意味のある値を出すには項の数が足りない
	#[error("収束加速には {required} 項が必要ですが、 {available} 項しか与えられていません")]
	InsufficientTerms {
		required: usize,
		available: usize
	},
	/// 上限の項数まで足しても収束判定を満たさなかった
	#[error("{terms} 項を足しても収束しませんでした")]
	NonConvergence {
		terms: usize
	},
	/// 推定値が NaN になった
	#[error("{terms} 項目で推定値が NaN になりました")]
	NotANumber {
		terms: usize
	}
}

/// 連分数の評価の際のエラー
#[derive(Error,Debug,Clone,PartialEq,Eq)]
pub enum ContinuedFractionError {
	/// 反復回数の上限に達しても収束しなかった
	#[error("連分数が {iterations} 回の反復で収束しませんでした")]
	NonConvergence {
		iterations: usize
	},
	/// a_k と b_k がともに 0 になり、以降の近似分数が定まらない
	#[error("連分数の第 {stage} 段で a_k = b_k = 0 となり値が定まりません")]
	Indeterminate {
		stage: usize
	},
	/// 引数や途中の値が NaN になった
	#[error("連分数の第 {stage} 段で値が NaN になりました")]
	NotANumber {
		stage: usize
	}
}

impl ContinuedFractionError {
	/// 収束値が得られなかったことを表すエラーであるか。
	/// 値が定まらない場合も、反復を続けても収束しないのでこれに含める
	pub fn is_non_convergence(&self) -> bool {
		matches!(self,Self::NonConvergence{..}|Self::Indeterminate{..})
	}
}
