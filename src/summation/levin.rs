//! ## `levin`
//! Levin の変換 (u, t, d, v 型)

use super::*;

/// Levin の変換の漸化式。重みは
/// c_k(n) = (β+n)/(β+n+k) · ((β+n+k−1)/(β+n+k))^{k−2}
#[derive(Debug,Clone,Copy,PartialEq,Eq,Default)]
pub struct Levin;

impl Recurrence for Levin {
	const NAME: &'static str = "Levin";
	fn weight<R:Float>(beta:R,n:R,k:usize) -> R {
		if k==1 { return R::one(); }
		let bn = beta+n;
		let kk = R::from(k).unwrap_or_else(R::nan);
		let ratio = (bn+kk-R::one()) / (bn+kk);
		bn/(bn+kk) * ratio.powi((k-2) as i32)
	}
}

/// Levin の変換
pub type LevinSum<S,T> = TableSum<S,T,Levin>;

impl<S:Accumulator<T>,T:Term> TableSum<S,T,Levin> {
	/// u 型: 剰余を (β+n) a_n で推定する。対数的に収束する級数に向く
	pub fn u(inner:S) -> Self { Self::new(inner,RemainderEstimate::U) }
	/// t 型: 剰余を a_n で推定する。交代級数に向く
	pub fn t(inner:S) -> Self { Self::new(inner,RemainderEstimate::T) }
	/// d 型: 剰余を次の項 a_{n+1} で推定する
	pub fn d(inner:S) -> Self { Self::new(inner,RemainderEstimate::D) }
	/// v 型: 剰余を a_n a_{n+1} / (a_n − a_{n+1}) で推定する
	pub fn v(inner:S) -> Self { Self::new(inner,RemainderEstimate::V) }
}



#[cfg(test)]
use crate::summation::test_helpers::*;

#[cfg(test)]
/// 全ての型の Levin 変換を単純な和の上に作る
fn all_variants() -> Vec<(&'static str,LevinSum<BasicSum<f64>,f64>)> {
	vec![
		("u",LevinSum::u(BasicSum::new())),
		("t",LevinSum::t(BasicSum::new())),
		("d",LevinSum::d(BasicSum::new())),
		("v",LevinSum::v(BasicSum::new())),
	]
}

#[cfg(test)]
#[test]
/// 発散する漸近級数 2F0(1,1;;-1/3) の値を、部分和が発散するより前に再現する
fn divergent_hypergeometric_test() {
	let terms = hyperg_2f0_terms(16);
	let mut raw = BasicSum::new();
	raw.extend(terms.iter().copied());
	assert!( (raw.estimate()-HYPERG_2F0).abs() > 1.0 );
	for (name,mut l) in all_variants() {
		l.extend(terms.iter().copied());
		assert_close(l.estimate(),HYPERG_2F0,1e-8,&format!("Levin {}",name));
	}
}

#[cfg(test)]
#[test]
/// u 型は対数的に収束する ζ(1.2) を加速する
fn zeta_u_test() {
	let term = zeta_term(1.2);
	let mut l = LevinSum::u(BasicSum::new());
	for k in 0..10 { l += term(k); }
	assert_close(l.estimate(),ZETA_1_2,1e-7,"Levin u ζ(1.2)");
}

#[cfg(test)]
#[test]
/// 交代級数を t 型で加速する
fn alternating_t_test() {
	let mut l = LevinSum::t(KahanSum::new());
	l.extend((0..14).map(alternating_harmonic));
	assert_close(l.estimate(),std::f64::consts::LN_2,1e-12,"Levin t ln2");
}

#[cfg(test)]
#[test]
/// 0 が続く場合はどの型でも初項がそのまま返る
fn constant_sequence_test() {
	for (name,mut l) in all_variants() {
		l.reset(0.3);
		for _ in 0..6 { l += 0.0; }
		assert_eq!(l.estimate(),0.3,"Levin {}",name);
	}
}

#[cfg(test)]
#[test]
/// k=1 の重みは 1 で、 k が大きくなってもオーバーフローしない
fn weight_test() {
	assert_eq!(Levin::weight(1.0_f64,0.0,1),1.0);
	assert_eq!(Levin::weight(1.0_f64,0.0,2),1.0/3.0);
	let w = Levin::weight(1.0_f64,3.0,200);
	assert!(w.is_finite() && w>0.0 && w<1.0);
}

#[cfg(test)]
#[test]
/// 複素数の項でも動作する
fn complex_terms_test() {
	let z = Complex::new(0.0,-1.0/3.0);
	let mut l = LevinSum::t(BasicSum::new());
	let mut raw = BasicSum::new();
	let mut term = Complex::new(1.0,0.0);
	l += term;
	raw += term;
	for k in 1..20 {
		term *= z*(k as f64);
		l += term;
		raw += term;
	}
	// 2F0(1,1;;z) は z が虚軸上でも発散する漸近級数
	assert!(raw.estimate().norm() > 1e3);
	assert!(l.estimate().norm() < 2.0);
	assert!(l.estimate().is_finite());
}
