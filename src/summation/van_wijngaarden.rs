//! ## `van_wijngaarden`
//! 正項級数を交代級数に組み替える van Wijngaarden の変換と、交代級数に効く Euler の変換

use super::*;
use std::collections::HashMap;

/// 添字から級数の項を返すもの。 `FnMut(usize) -> T` のクロージャはそのまま使える
pub trait TermSource<T> {
	/// 第 k 項 (0 始まり)
	fn term(&mut self,k:usize) -> T;
}

impl<T,F:FnMut(usize)->T> TermSource<T> for F {
	#[inline]
	fn term(&mut self,k:usize) -> T { self(k) }
}

/// 1つの組み替え後の項を作るのに足し合わせる元の項の最大数
const MAX_LEVELS:usize = 64;

/// van Wijngaarden の変換。正項級数 Σ a_k を、
/// v_j = (−1)^j Σ_i 2^i a_{2^i(j+1)−1}
/// を項とする交代級数 Σ v_j に組み替える。組み替えた級数は Euler の変換や
/// Weniger の δ 変換などの交代級数向けの加速がよく効く。
///
/// 各 v_j の和は、新しい寄与が既に足した分に比べて機械イプシロン未満になったところで打ち切る。
/// 元の項は添字ごとに記憶しておき、異なる v_j から同じ項を要求されても再計算しない。
/// 添字が `usize` を超える場合もそこで打ち切るので、非常にゆっくり収束する級数では精度が頭打ちになる。
///
/// 元の級数が正項級数でない場合、組み替えた項は減衰せず意味のある和にならない。
/// 元の項の符号が変わったら一度だけ警告を出す。
#[derive(Debug,Clone)]
pub struct VanWijngaardenCompressor<F,T:Term> {
	source: F,
	cache: HashMap<usize,T>,
	evaluations: usize,
	/// 符号を比べる基準にする、最初に計算した 0 でない元の項
	reference: Option<T>,
	sign_changed: bool
}

impl<F:TermSource<T>,T:Term> VanWijngaardenCompressor<F,T> {
	/// 元の級数の項を与えて作る
	pub fn new(source:F) -> Self {
		Self { source, cache: HashMap::new(), evaluations: 0, reference: None, sign_changed: false }
	}

	/// 元の級数の第 k 項。初めて要求されたときだけ計算する
	fn original(&mut self,k:usize) -> T {
		if let Some(&value) = self.cache.get(&k) { return value; }
		let value = self.source.term(k);
		self.evaluations += 1;
		self.check_sign(k,value);
		self.cache.insert(k,value);
		value
	}

	/// 基準の項と向きが逆の項を見つけたら警告する。
	/// 実数では |r+v| < max(|r|,|v|) が符号の違いと同値になる
	fn check_sign(&mut self,k:usize,value:T) {
		if self.sign_changed || value.is_zero() { return; }
		let Some(r) = self.reference else {
			self.reference = Some(value);
			return;
		};
		if (r+value).magnitude() < r.magnitude().max(value.magnitude()) {
			log_warn!("van Wijngaarden: 元の級数の第 {} 項で符号が変わりました。正項級数でないと組み替えた項は減衰しません",k);
			self.sign_changed = true;
		}
	}

	/// 組み替えた級数の第 j 項 v_j
	pub fn compressed(&mut self,j:usize) -> T {
		let mut total = T::zero();
		let mut weight = T::Real::one();
		let mut index = j.checked_add(1);
		for level in 0..MAX_LEVELS {
			let Some(i) = index else {
				log_debug!("van Wijngaarden: v_{} は {} 段目で添字が上限に達したため打ち切ります",j,level);
				break;
			};
			let t = self.original(i-1) * T::from_real(weight);
			total += t;
			if t.magnitude() < T::epsilon()*total.magnitude() { break; }
			weight = weight+weight;
			index = i.checked_mul(2);
		}
		if j%2==1 { -total } else { total }
	}

	/// 組み替えた級数の項 v_0, v_1, ... を順に返すイテレータ
	pub fn iter(&mut self) -> impl Iterator<Item=T> + '_ {
		(0..).map(move |j| self.compressed(j))
	}

	/// 記憶している元の項の数
	pub fn cached_terms(&self) -> usize { self.cache.len() }
	/// これまでに元の級数の項を計算した回数
	pub fn original_terms_evaluated(&self) -> usize { self.evaluations }
	/// これまでに計算した元の項の中で符号が変わったか
	pub fn sign_changed(&self) -> bool { self.sign_changed }
}

impl<F:TermSource<T>,T:Term> TermSource<T> for VanWijngaardenCompressor<F,T> {
	fn term(&mut self,k:usize) -> T { self.compressed(k) }
}



/// Euler の変換による交代級数の和。
/// 項を受け取るたびに前進差分の表を1段ずつ更新し、差分が小さくなる間は変換に使う段数を増やしていく。
/// 交代級数の項をそのまま (符号込みで) 与える。
#[derive(Debug,Clone,PartialEq)]
pub struct VanWijngaardenSum<T:Term> {
	/// 差分の表の最新の反対角線
	diffs: Vec<T>,
	sum: T,
	num_terms: usize
}

impl<T:Term> VanWijngaardenSum<T> {
	pub fn new() -> Self {
		Self { diffs: vec![], sum: T::zero(), num_terms: 0 }
	}
	/// 変換に使っている差分の段数
	pub fn order(&self) -> usize { self.diffs.len() }
}

impl<T:Term> Default for VanWijngaardenSum<T> {
	fn default() -> Self { Self::new() }
}

impl<T:Term> Accumulator<T> for VanWijngaardenSum<T> {
	fn incorporate(&mut self,term:T) {
		let half = T::from_real(T::real_from_f64(0.5));
		self.num_terms += 1;
		if self.diffs.is_empty() {
			self.diffs.push(term);
			self.sum = term*half;
			return;
		}
		let n = self.diffs.len();
		let mut carry = std::mem::replace(&mut self.diffs[0],term);
		for j in 0..n-1 {
			let next = self.diffs[j+1];
			self.diffs[j+1] = half*(self.diffs[j]+carry);
			carry = next;
		}
		let candidate = half*(self.diffs[n-1]+carry);
		if candidate.magnitude() <= self.diffs[n-1].magnitude() {
			// 差分が減っている間は段数を増やす
			self.diffs.push(candidate);
			self.sum += half*candidate;
		} else {
			self.sum += candidate;
		}
	}
	fn estimate(&self) -> T {
		// 1項だけでは差分がなく、変換は初項の半分しか返さない
		if self.num_terms==1 { self.diffs[0] } else { self.sum }
	}
	fn num_terms(&self) -> usize { self.num_terms }
	fn clear(&mut self) {
		self.diffs.clear();
		self.sum = T::zero();
		self.num_terms = 0;
	}
}



#[cfg(test)]
use crate::summation::test_helpers::*;

#[cfg(test)]
#[test]
/// 交代調和級数は直接の和よりはるかに速く ln 2 に近づく
fn euler_sum_test() {
	let ln2 = std::f64::consts::LN_2;
	let mut e = VanWijngaardenSum::new();
	for k in 0..20 { e += alternating_harmonic(k); }
	assert_close(e.estimate(),ln2,1e-9,"Euler 20");
	e.extend((20..40).map(alternating_harmonic));
	assert_close(e.estimate(),ln2,1e-10,"Euler 40");
	let mut raw = BasicSum::new();
	raw.extend((0..40).map(alternating_harmonic));
	assert!( (raw.estimate()-ln2).abs() > 1e-3 );
	assert!(e.order()>1);
}

#[cfg(test)]
#[test]
/// 元の項は一度しか計算されない
fn compressor_cache_test() {
	let mut c = VanWijngaardenCompressor::new(|k:usize| ((k+1) as f64).powi(-2));
	let v0 = c.compressed(0);
	let evaluated = c.original_terms_evaluated();
	assert!(evaluated>1);
	assert_eq!(c.compressed(0),v0);
	assert_eq!(c.original_terms_evaluated(),evaluated);
	assert_eq!(c.cached_terms(),evaluated);
	// v_1 は a_1, a_3, a_7, ... を使うので、 v_0 の計算で大半が揃っている
	let v1 = c.compressed(1);
	assert!(v1<0.0 && v0>0.0);
	assert!(c.original_terms_evaluated() <= evaluated+1);
	assert!(!c.sign_changed());
}

#[cfg(test)]
#[test]
/// 元の項の符号が変わったことを記録する
fn sign_change_test() {
	let mut c = VanWijngaardenCompressor::new(alternating_harmonic);
	assert!(!c.sign_changed());
	c.compressed(0);
	assert!(c.sign_changed());

	// 先頭の 0 は基準にしない
	let mut c = VanWijngaardenCompressor::new(|k:usize| if k==0 { 0.0 } else { -1.0/(k*k) as f64 });
	c.compressed(0);
	c.compressed(1);
	assert!(!c.sign_changed());

	let mut c = VanWijngaardenCompressor::new(|k:usize| Complex::new(0.0,((k+1) as f64).powi(-2)));
	c.compressed(0);
	assert!(!c.sign_changed());
}

#[cfg(test)]
#[test]
/// 0 が続く場合は初項がそのまま返る
fn constant_sequence_test() {
	let mut e = VanWijngaardenSum::new();
	e.reset(0.3_f64);
	assert_eq!(e.num_terms(),1);
	assert_eq!(e.estimate(),0.3);
	for _ in 0..6 {
		e += 0.0;
		assert_eq!(e.estimate(),0.3);
	}
	e.clear();
	assert_eq!(e.num_terms(),0);
	assert_eq!(e.order(),0);
}

#[cfg(test)]
#[test]
/// 正項級数 ζ(2) を交代級数に組み替えて、 Euler の変換の上に δ 変換を重ねる
fn zeta_two_test() {
	let exact = std::f64::consts::PI.powi(2)/6.0;
	let mut c = VanWijngaardenCompressor::new(|k:usize| ((k+1) as f64).powi(-2));
	let mut w = WenigerSum::delta(VanWijngaardenSum::new());
	w.extend(c.iter().take(30));
	assert_close(w.estimate(),exact,1e-10,"ζ(2)");
}

#[cfg(test)]
#[test]
/// 組み替えた項もクロージャと同じく `TermSource` として扱える
fn term_source_test() {
	fn first_terms<S:TermSource<f64>>(source:&mut S,count:usize) -> Vec<f64> {
		(0..count).map(|k| source.term(k)).collect()
	}
	let mut geometric = |k:usize| 0.5_f64.powi(k as i32);
	assert_eq!(first_terms(&mut geometric,3),vec![1.0,0.5,0.25]);
	let mut c = VanWijngaardenCompressor::new(geometric);
	let v = first_terms(&mut c,2);
	assert_eq!(v.len(),2);
	assert!(v[0]>2.5 && v[1]<0.0);
}
