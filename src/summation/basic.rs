//! ## `basic`
//! 単純な和と、丸め誤差を補償する和。全ての変換の最も内側に置くアキュムレータ。

use super::*;

/// 項をそのまま足していくだけの和
#[derive(Debug,Clone,PartialEq)]
pub struct BasicSum<T:Term> {
	sum: T,
	num_terms: usize
}

impl<T:Term> BasicSum<T> {
	pub fn new() -> Self {
		Self { sum: T::zero(), num_terms: 0 }
	}
	/// 初項を与えて作る
	pub fn with_initial(term:T) -> Self {
		let mut s = Self::new();
		s.incorporate(term);
		s
	}
}

impl<T:Term> Default for BasicSum<T> {
	fn default() -> Self { Self::new() }
}

impl<T:Term> Accumulator<T> for BasicSum<T> {
	#[inline]
	fn incorporate(&mut self,term:T) {
		self.sum += term;
		self.num_terms += 1;
	}
	#[inline]
	fn estimate(&self) -> T { self.sum }
	fn num_terms(&self) -> usize { self.num_terms }
	fn clear(&mut self) {
		self.sum = T::zero();
		self.num_terms = 0;
	}
}



/// 丸め誤差を補償する和 (Kahan-Babuška / Neumaier の方式)。
/// 各加算で失われた下位の桁を `compensation` に貯めておき、推定値を返すときに足し戻す。
/// 大きな項が後から来ても補償が崩れないように、大きさを比べてから残差を取り出す。
#[derive(Debug,Clone,PartialEq)]
pub struct KahanSum<T:Term> {
	sum: T,
	compensation: T,
	num_terms: usize
}

impl<T:Term> KahanSum<T> {
	pub fn new() -> Self {
		Self { sum: T::zero(), compensation: T::zero(), num_terms: 0 }
	}
	/// 初項を与えて作る
	pub fn with_initial(term:T) -> Self {
		let mut s = Self::new();
		s.incorporate(term);
		s
	}
	/// まだ足し戻していない丸め誤差
	pub fn compensation(&self) -> T { self.compensation }
}

impl<T:Term> Default for KahanSum<T> {
	fn default() -> Self { Self::new() }
}

impl<T:Term> Accumulator<T> for KahanSum<T> {
	fn incorporate(&mut self,term:T) {
		let t = self.sum + term;
		if self.sum.magnitude() >= term.magnitude() {
			self.compensation += (self.sum - t) + term;
		} else {
			self.compensation += (term - t) + self.sum;
		}
		self.sum = t;
		self.num_terms += 1;
	}
	#[inline]
	fn estimate(&self) -> T { self.sum + self.compensation }
	fn num_terms(&self) -> usize { self.num_terms }
	fn clear(&mut self) {
		self.sum = T::zero();
		self.compensation = T::zero();
		self.num_terms = 0;
	}
}



#[cfg(test)]
#[test]
/// 桁落ちが起こる並びで、補償付きの和が正確な値を返すか確かめる
fn kahan_sum_test() {
	let terms = [1.0,1e100,1.0,-1e100];
	let mut basic = BasicSum::new();
	let mut kahan = KahanSum::new();
	for t in terms {
		basic += t;
		kahan += t;
	}
	assert_eq!(basic.estimate(),0.0);
	assert_eq!(kahan.estimate(),2.0);
	assert_eq!(kahan.num_terms(),4);

	// 0.1 を1000万回足す
	let mut basic = BasicSum::new();
	let mut kahan = KahanSum::new();
	for _ in 0..10_000_000 {
		basic += 0.1_f64;
		kahan += 0.1_f64;
	}
	let exact = 1_000_000.0;
	assert!( (kahan.estimate()-exact).abs() < (basic.estimate()-exact).abs() );
	assert!( (kahan.estimate()-exact).abs() <= 1e-9 );
}

#[cfg(test)]
#[test]
/// 初項だけを与えた後に 0 が続く場合は初項がそのまま返る
fn constant_sequence_test() {
	let mut basic = BasicSum::with_initial(0.3_f64);
	let mut kahan = KahanSum::with_initial(0.3_f64);
	basic.extend([0.0;8]);
	kahan.extend([0.0;8]);
	assert_eq!(basic.estimate(),0.3);
	assert_eq!(kahan.estimate(),0.3);

	kahan.reset(1.0);
	assert_eq!(kahan.num_terms(),1);
	assert_eq!(kahan.try_estimate(),Ok(1.0));
	kahan.clear();
	assert!(kahan.try_estimate().is_err());
}

#[cfg(test)]
#[test]
/// 複素数の項も補償付きで足せる
fn complex_kahan_test() {
	let mut kahan = KahanSum::new();
	for t in [Complex::new(1.0,1e100),Complex::new(1.0,1.0),Complex::new(-1.0,-1e100)] {
		kahan += t;
	}
	assert_eq!(kahan.estimate(),Complex::new(1.0,1.0));
}
