//! ## `series`
//! 級数の項をアキュムレータに流し込み、収束したところで止める呼び出し側のループ

use super::*;
use std::marker::PhantomData;

/// 級数の和を求めるときの停止条件
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct SeriesConfig<R> {
	/// 推定値の大きさに対する相対的な許容誤差
	pub tolerance: R,
	/// 取り込む項の数の上限
	pub max_terms: usize,
	/// 推定値の変化が許容誤差以下になる状態が何回続いたら収束とみなすか
	pub confirmations: usize
}

impl<R:Float> Default for SeriesConfig<R> {
	/// 許容誤差は計算機イプシロンの4倍、項の数の上限は 1000、確認の回数は 2
	fn default() -> Self {
		let four = R::one()+R::one()+R::one()+R::one();
		Self {
			tolerance: R::epsilon()*four,
			max_terms: 1000,
			confirmations: 2
		}
	}
}

impl<R:Float> SeriesConfig<R> {
	pub fn tolerance(mut self,tolerance:R) -> Self {
		self.tolerance = tolerance;
		self
	}
	pub fn max_terms(mut self,max_terms:usize) -> Self {
		self.max_terms = max_terms;
		self
	}
	pub fn confirmations(mut self,confirmations:usize) -> Self {
		self.confirmations = confirmations;
		self
	}

	/// `terms` の項を順に `acc` に取り込み、収束した推定値を返す。
	/// * 項の大きさが推定値の大きさの `tolerance` 倍以下になったら収束とする
	/// * 推定値の変化が `tolerance` 倍以下である状態が `confirmations` 回続いても収束とする
	/// * 推定値が NaN になったら `NotANumber` を、 `max_terms` 項で収束しなければ `NonConvergence` を返す
	/// * 上限より前に項が尽きた場合は、その時点の推定値を返す
	pub fn sum<T,A,I>(&self,acc:&mut A,terms:I) -> Result<T,SummationError>
	where
		T: Term<Real=R>,
		A: Accumulator<T>+?Sized,
		I: IntoIterator<Item=T>
	{
		let mut previous:Option<T> = None;
		let mut stable = 0;
		let mut consumed = 0;
		for term in terms.into_iter().take(self.max_terms) {
			acc.incorporate(term);
			consumed += 1;
			let estimate = acc.estimate();
			if estimate.is_nan() {
				log_warn!("級数の和: {} 項目で推定値が NaN になりました",consumed);
				return Err(SummationError::NotANumber { terms: consumed });
			}
			// 変換が意味のある値を出すまでは判定しない
			if acc.num_terms() < acc.required_terms() {
				previous = Some(estimate);
				continue;
			}
			let scale = self.tolerance * estimate.magnitude();
			if term.magnitude() <= scale {
				log_debug!("級数の和: {} 項で項が十分小さくなりました",consumed);
				return Ok(estimate);
			}
			if let Some(p) = previous {
				if (estimate-p).magnitude() <= scale {
					stable += 1;
					if stable >= self.confirmations {
						log_debug!("級数の和: {} 項で推定値が安定しました",consumed);
						return Ok(estimate);
					}
				} else {
					stable = 0;
				}
			}
			previous = Some(estimate);
		}
		if consumed < self.max_terms {
			return acc.try_estimate();
		}
		log_warn!("級数の和: {} 項を足しても収束しませんでした",consumed);
		Err(SummationError::NonConvergence { terms: consumed })
	}
}

/// 既定の停止条件で `terms` の和を `acc` を通して求める
pub fn sum_series<T,A,I>(acc:&mut A,terms:I) -> Result<T,SummationError>
where
	T: Term,
	A: Accumulator<T>+?Sized,
	I: IntoIterator<Item=T>
{
	SeriesConfig::<T::Real>::default().sum(acc,terms)
}



/// 項を1つ取り込むごとに推定値を返すイテレータ
#[derive(Debug,Clone)]
pub struct Estimates<I,A,T> {
	terms: I,
	accumulator: A,
	_term: PhantomData<fn(T)>
}

impl<I,A,T> Estimates<I,A,T> {
	/// 内部のアキュムレータへの参照
	pub fn accumulator(&self) -> &A { &self.accumulator }
	/// 内部のアキュムレータを取り出す
	pub fn into_accumulator(self) -> A { self.accumulator }
}

impl<I,A,T> Iterator for Estimates<I,A,T>
where
	I: Iterator<Item=T>,
	A: Accumulator<T>,
	T: Term
{
	type Item = T;
	fn next(&mut self) -> Option<T> {
		let term = self.terms.next()?;
		self.accumulator.incorporate(term);
		Some(self.accumulator.estimate())
	}
	fn size_hint(&self) -> (usize,Option<usize>) {
		self.terms.size_hint()
	}
}

impl<I,A,T> ExactSizeIterator for Estimates<I,A,T>
where
	I: ExactSizeIterator<Item=T>,
	A: Accumulator<T>,
	T: Term
{}

pub trait IteratorEstimatesExtension<T:Term>: Iterator<Item=T>+Sized {
	/// 項のイテレータを、アキュムレータの推定値のイテレータに変換する
	fn estimates<A:Accumulator<T>>(self,accumulator:A) -> Estimates<Self,A,T>;
}

impl<T:Term,I:Iterator<Item=T>> IteratorEstimatesExtension<T> for I {
	fn estimates<A:Accumulator<T>>(self,accumulator:A) -> Estimates<Self,A,T> {
		Estimates { terms: self, accumulator, _term: PhantomData }
	}
}



/// このモジュールからクレートの `prelude` でアクセスできるようにするアイテムをまとめたもの
pub(crate) mod for_prelude {
	pub use super::{
		SeriesConfig,
		sum_series,
		Estimates,
		IteratorEstimatesExtension
	};
}



#[cfg(test)]
use crate::summation::test_helpers::*;

#[cfg(test)]
#[test]
/// 等比級数は項が十分小さくなったところで止まる
fn geometric_series_test() {
	let mut acc = BasicSum::new();
	let value = sum_series(&mut acc,(0..).map(|k| 0.5_f64.powi(k))).unwrap();
	assert!( (value-2.0).abs() <= 4.0*f64::EPSILON );
	assert!(acc.num_terms() < 60);
}

#[cfg(test)]
#[test]
/// 調和級数は上限の項数に達してエラーになる
fn non_convergence_test() {
	let config = SeriesConfig::default().max_terms(100);
	let mut acc = KahanSum::new();
	let result = config.sum(&mut acc,(1..).map(|k| 1.0/(k as f64)));
	assert_eq!(result,Err(SummationError::NonConvergence { terms: 100 }));
	assert_eq!(acc.num_terms(),100);
}

#[cfg(test)]
#[test]
/// NaN は値を返さずにエラーとする
fn not_a_number_test() {
	let mut acc = AitkenSum::basic();
	let result = sum_series(&mut acc,[1.0,0.5,f64::NAN,0.125]);
	assert_eq!(result,Err(SummationError::NotANumber { terms: 3 }));
}

#[cfg(test)]
#[test]
/// 項が尽きたらその時点の推定値を返し、変換に足りなければエラーとする
fn exhausted_terms_test() {
	let mut acc = BasicSum::new();
	assert_eq!(sum_series(&mut acc,[1.0,2.0,3.0]),Ok(6.0));
	let mut acc = ShanksSum::shanks();
	assert_eq!(
		sum_series(&mut acc,[1.0_f64,0.5]),
		Err(SummationError::InsufficientTerms { required: 5, available: 2 })
	);
}

#[cfg(test)]
#[test]
/// 発散する漸近級数も、推定値が安定したところで止まる
fn divergent_series_test() {
	let config = SeriesConfig::default().tolerance(1e-10);
	let mut acc = LevinSum::t(BasicSum::new());
	let value = config.sum(&mut acc,hyperg_2f0_terms(100)).unwrap();
	assert_close(value,HYPERG_2F0,1e-10,"Levin t");
	assert!(acc.num_terms() < 30);

	// 計算機イプシロン程度までは安定しないので上限で止まる
	let mut acc = WenigerSum::delta(BasicSum::new());
	let result = SeriesConfig::default().max_terms(80).sum(&mut acc,hyperg_2f0_terms(100));
	assert_eq!(result,Err(SummationError::NonConvergence { terms: 80 }));
}

#[cfg(test)]
#[test]
/// 推定値のイテレータ
fn estimates_test() {
	let partial:Vec<f64> = (0..4).map(|k| 0.5_f64.powi(k)).estimates(BasicSum::new()).collect();
	assert_eq!(partial,vec![1.0,1.5,1.75,1.875]);

	let mut aitken = AitkenSum::basic();
	let last = (0..3).map(|k| 0.5_f64.powi(k)).estimates(&mut aitken).last();
	assert_eq!(last,Some(2.0));
	assert_eq!(aitken.num_terms(),3);

	let estimates = (0..12).map(alternating_harmonic).estimates(WynnEpsilonSum::basic());
	assert_eq!(estimates.len(),12);
	let wynn = estimates.last();
	assert!( (wynn.unwrap()-std::f64::consts::LN_2).abs() < 1e-8 );
}
