//! ## `aitken`
//! Aitken の Δ² 変換と、それを2回重ねた Shanks 変換

use super::*;

/// Aitken の Δ² 変換。
/// 内側のアキュムレータの直近3つの推定値 S₀, S₁, S₂ から
/// S* = S₂ − (ΔS₁)² / (ΔS₁ − ΔS₀) を求める。
#[derive(Debug,Clone)]
pub struct AitkenSum<S,T:Term> {
	inner: S,
	/// 直近の推定値 (古い順)
	history: [T;3],
	/// `history` に入っている値の数 (最大3)
	filled: usize,
	value: T
}

/// Shanks 変換。 Aitken 変換の出力の列をもう一度 Aitken 変換にかける
pub type ShanksSum<S,T> = AitkenSum<AitkenSum<S,T>,T>;

impl<S:Accumulator<T>,T:Term> AitkenSum<S,T> {
	/// 内側のアキュムレータを包んで作る
	pub fn new(inner:S) -> Self {
		let value = inner.estimate();
		let mut s = Self {
			inner,
			history: [T::zero();3],
			filled: 0,
			value
		};
		// 既に項を持つアキュムレータを包んだ場合はその推定値から始める
		if s.inner.num_terms()>0 { s.push(value); }
		s
	}
	/// 内側のアキュムレータへの参照
	pub fn inner(&self) -> &S { &self.inner }

	fn push(&mut self,s:T) {
		if self.filled<3 {
			self.history[self.filled] = s;
			self.filled += 1;
		} else {
			self.history.rotate_left(1);
			self.history[2] = s;
		}
		self.value = self.extrapolate();
	}

	fn extrapolate(&self) -> T {
		if self.filled<3 { return self.history[self.filled-1]; }
		let [s0,s1,s2] = self.history;
		let d0 = s1 - s0;
		let d1 = s2 - s1;
		let den = d1 - d0;
		// 3点が一直線に並ぶ (停滞している) 場合は割らずに生の値を返す
		if den.magnitude() <= T::epsilon() * s2.magnitude() {
			log_trace!("Aitken: 分母 {:?} が退化しているため生の推定値を返します",den);
			return s2;
		}
		s2 - d1*d1/den
	}
}

impl<T:Term> AitkenSum<BasicSum<T>,T> {
	/// 単純な和を包んだ Aitken 変換を作る
	pub fn basic() -> Self {
		Self::new(BasicSum::new())
	}
}

impl<T:Term> ShanksSum<BasicSum<T>,T> {
	/// 単純な和に Aitken 変換を2回重ねた Shanks 変換を作る
	pub fn shanks() -> Self {
		Self::new(AitkenSum::new(BasicSum::new()))
	}
}

impl<S:Accumulator<T>,T:Term> Accumulator<T> for AitkenSum<S,T> {
	fn incorporate(&mut self,term:T) {
		self.inner.incorporate(term);
		let s = self.inner.estimate();
		self.push(s);
	}
	fn estimate(&self) -> T {
		if self.filled==0 { self.inner.estimate() } else { self.value }
	}
	fn num_terms(&self) -> usize { self.inner.num_terms() }
	fn clear(&mut self) {
		self.inner.clear();
		self.filled = 0;
		self.value = self.inner.estimate();
	}
	fn required_terms(&self) -> usize { self.inner.required_terms()+2 }
}



#[cfg(test)]
use crate::summation::test_helpers::*;

#[cfg(test)]
#[test]
/// 等比級数は3項で閉じた形の極限を再現する
fn geometric_series_test() {
	for r in [0.3_f64,-0.7,0.5,-0.5] {
		let mut a = AitkenSum::basic();
		for k in 0..3 { a += r.powi(k); }
		let exact = 1.0/(1.0-r);
		assert!(
			(a.estimate()-exact).abs() <= 8.0*f64::EPSILON*exact.abs(),
			"r={}: {} != {}",r,a.estimate(),exact
		);
	}
}

#[cfg(test)]
#[test]
/// 3つ揃うまでは生の推定値、0 が続く場合は初項のまま
fn fallback_test() {
	let mut a = AitkenSum::basic();
	assert_eq!(a.try_estimate(),Err(SummationError::InsufficientTerms{ required: 3, available: 0 }));
	a += 0.5_f64;
	assert_eq!(a.estimate(),0.5);
	a += 0.25;
	assert_eq!(a.estimate(),0.75);
	assert!(a.try_estimate().is_err());

	let mut a = AitkenSum::basic();
	a.reset(0.3_f64);
	for _ in 0..6 { a += 0.0; }
	assert_eq!(a.estimate(),0.3);

	let mut s = ShanksSum::shanks();
	s.reset(0.3_f64);
	for _ in 0..6 { s += 0.0; }
	assert_eq!(s.estimate(),0.3);
	assert_eq!(s.required_terms(),5);
}

#[cfg(test)]
#[test]
/// 2回目の Aitken 変換による変化は1回目の改善量より小さい
fn shanks_test() {
	let ln2 = std::f64::consts::LN_2;
	let mut raw = BasicSum::new();
	let mut aitken = AitkenSum::basic();
	let mut shanks = ShanksSum::shanks();
	for k in 0..10 {
		let t = alternating_harmonic(k);
		raw += t;
		aitken += t;
		shanks += t;
	}
	let first = (aitken.estimate()-raw.estimate()).abs();
	let second = (shanks.estimate()-aitken.estimate()).abs();
	assert!(second < first);
	assert!( (shanks.estimate()-ln2).abs() < (aitken.estimate()-ln2).abs() );
	assert_close(shanks.estimate(),ln2,1e-5,"Shanks");
}

#[cfg(test)]
#[test]
/// 補償付きの和を包んでも、複素数の項でも動作する
fn composition_test() {
	let mut a = AitkenSum::new(KahanSum::new());
	let mut c = AitkenSum::new(BasicSum::new());
	let r = Complex::new(0.2,0.5);
	let mut p = Complex::new(1.0,0.0);
	for _ in 0..3 {
		a += p.re;
		c += p;
		p *= r;
	}
	let exact = Complex::new(1.0,0.0)/(Complex::new(1.0,0.0)-r);
	assert!( (c.estimate()-exact).norm() < 1e-14 );
	assert!(a.estimate().is_finite());
}

#[cfg(test)]
#[test]
/// NaN はそのまま伝播する
fn nan_propagation_test() {
	let mut a = AitkenSum::basic();
	for t in [1.0,0.5,f64::NAN,0.125] { a += t; }
	assert!(a.estimate().is_nan());
}
