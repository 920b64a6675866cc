//! ## `weniger`
//! Weniger の変換 (τ, δ, φ 型)

use super::*;

/// Weniger の変換の漸化式。 Pochhammer 記号の比から、重みは k≥2 で
/// c_k(n) = (β+n+k−1)(β+n+k−2) / ((β+n+2k−2)(β+n+2k−3))
/// となる。 k=1 では 1 とする。
#[derive(Debug,Clone,Copy,PartialEq,Eq,Default)]
pub struct Weniger;

impl Recurrence for Weniger {
	const NAME: &'static str = "Weniger";
	fn weight<R:Float>(beta:R,n:R,k:usize) -> R {
		if k==1 { return R::one(); }
		let bn = beta+n;
		let kk = R::from(k).unwrap_or_else(R::nan);
		let (one,two) = (R::one(),R::one()+R::one());
		(bn+kk-one)*(bn+kk-two) / ((bn+two*kk-two)*(bn+two*kk-two-one))
	}
}

/// Weniger の変換
pub type WenigerSum<S,T> = TableSum<S,T,Weniger>;

impl<S:Accumulator<T>,T:Term> TableSum<S,T,Weniger> {
	/// τ 型 (Σ 型とも): 剰余を a_n で推定する
	pub fn tau(inner:S) -> Self { Self::new(inner,RemainderEstimate::T) }
	/// δ 型: 剰余を次の項 a_{n+1} で推定する。発散する漸近級数や交代級数に特に強い
	pub fn delta(inner:S) -> Self { Self::new(inner,RemainderEstimate::D) }
	/// φ 型: 剰余を a_n a_{n+1} / (a_n − a_{n+1}) で推定する
	pub fn phi(inner:S) -> Self { Self::new(inner,RemainderEstimate::V) }
	/// y 型: 剰余を (β+n) a_n で推定する
	pub fn y(inner:S) -> Self { Self::new(inner,RemainderEstimate::U) }
}



#[cfg(test)]
use crate::summation::test_helpers::*;

#[cfg(test)]
#[test]
/// 発散する漸近級数 2F0(1,1;;-1/3) を全ての型で再現する
fn divergent_hypergeometric_test() {
	let terms = hyperg_2f0_terms(16);
	let variants:Vec<(&str,WenigerSum<BasicSum<f64>,f64>)> = vec![
		("τ",WenigerSum::tau(BasicSum::new())),
		("δ",WenigerSum::delta(BasicSum::new())),
		("φ",WenigerSum::phi(BasicSum::new())),
		("y",WenigerSum::y(BasicSum::new())),
	];
	for (name,mut w) in variants {
		w.extend(terms.iter().copied());
		assert_close(w.estimate(),HYPERG_2F0,1e-8,&format!("Weniger {}",name));
	}
}

#[cfg(test)]
#[test]
/// 重みの値。 k=2 では (β+n)/(β+n+2) に約分される
fn weight_test() {
	assert_eq!(Weniger::weight(1.0_f64,0.0,1),1.0);
	assert!( (Weniger::weight(1.0_f64,0.0,2)-1.0/3.0).abs() < 1e-15 );
	assert!( (Weniger::weight(1.0_f64,2.0,3)-20.0/42.0).abs() < 1e-15 );
}

#[cfg(test)]
#[test]
#[cfg(feature="coefficients")]
/// Stirling 級数 ln Γ(x) = (x−½)ln x − x + ½ln 2π + Σ B_{2n}/(2n(2n−1)x^{2n−1}) は
/// x=1 で発散するが、 δ 型で ln Γ(1) = 0 を再現できる
fn stirling_series_test() {
	let x = 1.0_f64;
	let base = (x-0.5)*x.ln() - x + 0.5*(2.0*std::f64::consts::PI).ln();
	let mut w = WenigerSum::delta(BasicSum::new());
	let mut raw = BasicSum::new();
	for n in 1..=20 {
		let b = bernoulli_2n(n).unwrap();
		let m = (2*n) as f64;
		let term = b / (m*(m-1.0)*x.powi(2*n as i32-1));
		w += term;
		raw += term;
	}
	assert!( (base+raw.estimate()).abs() > 1.0 );
	assert_close(base+w.estimate(),0.0,1e-10,"Stirling ln Γ(1)");
}

#[cfg(test)]
#[test]
/// 0 が続く場合は初項がそのまま返る
fn constant_sequence_test() {
	let mut w = WenigerSum::phi(KahanSum::new());
	w.reset(0.3_f64);
	for _ in 0..6 { w += 0.0; }
	assert_eq!(w.estimate(),0.3);
	w.clear();
	assert_eq!(w.num_terms(),0);
	assert_eq!(w.rows(),0);
}
