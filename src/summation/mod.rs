//! ## `summation`
//! 級数の項を1つずつ受け取って極限の推定値を与える「アキュムレータ」群。
//! 収束加速の変換は別のアキュムレータを包み、その推定値の列を入力の列として扱うため、
//! 同じ変換を重ねたり (Aitken を2回で Shanks)、別の変換と組み合わせたりできる。

use super::*;

/// 級数の項を受け取り、極限の推定値を与える共通のインターフェース
pub trait Accumulator<T:Term> {
	/// 次の項を取り込む
	fn incorporate(&mut self,term:T);
	/// 現在の最良の推定値を返す。変換に十分な項がなければ生の部分和などを返す
	fn estimate(&self) -> T;
	/// これまでに取り込んだ項の数
	fn num_terms(&self) -> usize;
	/// 状態を空に戻す。確保したメモリは再利用する
	fn clear(&mut self);
	/// 変換が意味のある値を出すのに必要な項の数
	fn required_terms(&self) -> usize { 1 }

	/// 状態を空に戻してから初項を取り込む
	fn reset(&mut self,initial:T) {
		self.clear();
		self.incorporate(initial);
	}

	/// 項の数が足りなければエラーとし、そうでなければ推定値を返す
	fn try_estimate(&self) -> Result<T,SummationError> {
		let required = self.required_terms();
		let available = self.num_terms();
		if available < required {
			return Err(SummationError::InsufficientTerms { required, available });
		}
		Ok(self.estimate())
	}
}

impl<T:Term,A:Accumulator<T>+?Sized> Accumulator<T> for &mut A {
	fn incorporate(&mut self,term:T) { (**self).incorporate(term) }
	fn estimate(&self) -> T { (**self).estimate() }
	fn num_terms(&self) -> usize { (**self).num_terms() }
	fn clear(&mut self) { (**self).clear() }
	fn required_terms(&self) -> usize { (**self).required_terms() }
}

impl<T:Term,A:Accumulator<T>+?Sized> Accumulator<T> for Box<A> {
	fn incorporate(&mut self,term:T) { (**self).incorporate(term) }
	fn estimate(&self) -> T { (**self).estimate() }
	fn num_terms(&self) -> usize { (**self).num_terms() }
	fn clear(&mut self) { (**self).clear() }
	fn required_terms(&self) -> usize { (**self).required_terms() }
}

/// * アキュムレータに `acc += term` と `acc.extend(terms)` の表記を与えるマクロ
/// * `accumulator_ops!( Type<generics> where bounds; ... )` のように指定する
macro_rules! accumulator_ops {
	( $( [$($g:tt)*] $ty:ty; )+ ) => { $(
		impl<$($g)*> std::ops::AddAssign<T> for $ty where $ty: Accumulator<T> {
			#[inline]
			fn add_assign(&mut self,term:T) {
				self.incorporate(term)
			}
		}
		impl<$($g)*> Extend<T> for $ty where $ty: Accumulator<T> {
			fn extend<I:IntoIterator<Item=T>>(&mut self,iter:I) {
				for term in iter { self.incorporate(term) }
			}
		}
	)+ };
}

mod basic;
pub use basic::*;

mod aitken;
pub use aitken::*;

mod wynn;
pub use wynn::*;

mod theta;
pub use theta::*;

mod table;
pub use table::*;

mod levin;
pub use levin::*;

mod weniger;
pub use weniger::*;

mod van_wijngaarden;
pub use van_wijngaarden::*;

accumulator_ops! {
	[T:Term] BasicSum<T>;
	[T:Term] KahanSum<T>;
	[T:Term,S] AitkenSum<S,T>;
	[T:Term,S] WynnEpsilonSum<S,T>;
	[T:Term,S] BrezinskiThetaSum<S,T>;
	[T:Term,S,R] TableSum<S,T,R>;
	[T:Term] VanWijngaardenSum<T>;
}



/// このモジュールからクレートの `prelude` でアクセスできるようにするアイテムをまとめたもの
pub(crate) mod for_prelude {
	pub use super::{
		Accumulator,
		BasicSum, KahanSum,
		AitkenSum, ShanksSum,
		WynnEpsilonSum,
		BrezinskiThetaSum,
		RemainderEstimate, Recurrence, TableSum,
		Levin, LevinSum,
		Weniger, WenigerSum,
		TermSource, VanWijngaardenSum, VanWijngaardenCompressor
	};
}



/// 各モジュールのテストで共通して使う補助関数
#[cfg(test)]
pub(crate) mod test_helpers {

	/// 相対誤差または絶対誤差が許容範囲内にあることを確かめる
	pub fn assert_close(value:f64,expected:f64,tolerance:f64,label:&str) {
		let err = (value-expected).abs();
		let scale = expected.abs().max(1.0);
		assert!(
			err <= tolerance*scale,
			"{}: {} と期待値 {} の差 {:e} が許容誤差 {:e} を超えています",
			label,value,expected,err,tolerance
		);
	}

	/// ζ(s) の定義級数の k 番目 (0 始まり) の項
	pub fn zeta_term(s:f64) -> impl Fn(usize) -> f64 {
		move |k| ((k+1) as f64).powf(-s)
	}

	/// 交代調和級数の k 番目 (0 始まり) の項。和は ln 2
	pub fn alternating_harmonic(k:usize) -> f64 {
		let sign = if k%2==0 { 1.0 } else { -1.0 };
		sign / ((k+1) as f64)
	}

	/// 2F0(1,1;;-1/3) の漸近級数の項を並べる。和は発散するが、ボレル和は 0.78625122076596
	pub fn hyperg_2f0_terms(count:usize) -> Vec<f64> {
		let (a,b,z) = (1.0,1.0,-1.0/3.0);
		let mut term = 1.0;
		let mut terms = vec![term];
		for k in 1..count {
			let k = k as f64;
			term *= (a+k-1.0)*(b+k-1.0)*z/k;
			terms.push(term);
		}
		terms
	}

	/// 2F0(1,1;;-1/3) の値
	pub const HYPERG_2F0: f64 = 0.78625122076596;

	/// ζ(1.2) の値
	pub const ZETA_1_2: f64 = 5.591582441177750776536563193423143277642;

}
