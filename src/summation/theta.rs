//! ## `theta`
//! Brezinski の θ アルゴリズム

use super::*;

/// Brezinski の θ アルゴリズム。 θ_{-1} = 0, θ_0(n) = s_n として
/// * θ_{2k+1}(n) = θ_{2k-1}(n+1) + 1 / Δθ_{2k}(n)
/// * θ_{2k+2}(n) = θ_{2k}(n+1) + Δθ_{2k}(n+1) Δθ_{2k+1}(n+1) / Δ²θ_{2k+1}(n)
///
/// で列を埋める。 Wynn の ε と同様に、分母が 0 に近ければ大きな値を入れ、
/// 推定値はそれに汚染されていない最も高い偶数列の値をとる。
/// ε より多くの項を必要とするが、対数的に収束する級数にも効くことがある。
/// `clear` は各列を空にするだけで、確保した列は使い回す。
#[derive(Debug,Clone)]
pub struct BrezinskiThetaSum<S,T:Term> {
	inner: S,
	/// `columns[k][n]` = θ_k(n)
	columns: Vec<Vec<T>>
}

impl<S:Accumulator<T>,T:Term> BrezinskiThetaSum<S,T> {
	/// 内側のアキュムレータを包んで作る
	pub fn new(inner:S) -> Self {
		let mut s = Self { inner, columns: vec![] };
		if s.inner.num_terms()>0 {
			let e = s.inner.estimate();
			s.push(e);
		}
		s
	}
	/// 内側のアキュムレータへの参照
	pub fn inner(&self) -> &S { &self.inner }

	/// テーブルの第 k 列 θ_k(0), θ_k(1), ... を返す
	pub fn column(&self,k:usize) -> Option<&[T]> {
		self.columns.get(k).filter(|c| !c.is_empty()).map(|c| c.as_slice())
	}

	/// θ_{k}(n)。 k = -1 に当たる列は 0 とする
	fn at(&self,k:isize,n:usize) -> T {
		if k<0 { T::zero() } else { self.columns[k as usize][n] }
	}
	/// 第 k 列の長さ。 k = -1 の列は無限に続くとみなす
	fn len(&self,k:isize) -> usize {
		if k<0 { usize::MAX } else { self.columns.get(k as usize).map_or(0,|c| c.len()) }
	}

	fn push(&mut self,s:T) {
		if self.columns.is_empty() { self.columns.push(vec![]); }
		self.columns[0].push(s);
		let huge = T::from_real(T::huge());
		let tiny = T::tiny();
		// 依存する値が揃った列だけ、1つずつ値を伸ばす
		let mut k:isize = 1;
		loop {
			let n = self.len(k);
			let odd = k%2==1;
			let ready = if odd {
				self.len(k-2)>n+1 && self.len(k-1)>n+1
			} else {
				self.len(k-2)>n+1 && self.len(k-1)>n+2
			};
			if !ready { break; }
			let value = if odd {
				let diff = self.at(k-1,n+1) - self.at(k-1,n);
				if diff.magnitude() <= tiny { huge }
				else { self.at(k-2,n+1) + T::one()/diff }
			} else {
				let d2 = self.at(k-1,n+2) - self.at(k-1,n+1) - self.at(k-1,n+1) + self.at(k-1,n);
				if d2.magnitude() <= tiny { huge }
				else {
					let num = (self.at(k-2,n+2) - self.at(k-2,n+1)) * (self.at(k-1,n+2) - self.at(k-1,n+1));
					self.at(k-2,n+1) + num/d2
				}
			};
			if value==huge {
				log_trace!("Brezinski θ: θ_{}({}) の分母が 0 に近いため極として扱います",k,n);
			}
			if self.columns.len() <= k as usize { self.columns.push(vec![]); }
			self.columns[k as usize].push(value);
			k += 1;
		}
	}

	/// 大きな値に汚染されていない、最も高い偶数列の最新の値
	fn best(&self) -> Option<T> {
		let limit = T::huge() * T::real_from_f64(0.01);
		self.columns.iter().enumerate()
		.rev()
		.filter(|(k,_)| k%2==0 )
		.filter_map(|(k,c)| c.last().map(|v| (k,*v)) )
		.find(|(k,v)| *k==0 || v.is_nan() || (v.is_finite() && v.magnitude() < limit) )
		.map(|(_,v)| v)
	}
}

impl<T:Term> BrezinskiThetaSum<BasicSum<T>,T> {
	/// 単純な和を包んだ θ アルゴリズムを作る
	pub fn basic() -> Self {
		Self::new(BasicSum::new())
	}
}

impl<S:Accumulator<T>,T:Term> Accumulator<T> for BrezinskiThetaSum<S,T> {
	fn incorporate(&mut self,term:T) {
		self.inner.incorporate(term);
		let s = self.inner.estimate();
		self.push(s);
	}
	fn estimate(&self) -> T {
		self.best().unwrap_or_else(|| self.inner.estimate())
	}
	fn num_terms(&self) -> usize { self.inner.num_terms() }
	fn clear(&mut self) {
		self.inner.clear();
		for c in self.columns.iter_mut() { c.clear(); }
	}
	fn required_terms(&self) -> usize { self.inner.required_terms()+3 }
}



#[cfg(test)]
use crate::summation::test_helpers::*;

#[cfg(test)]
#[test]
/// 交代調和級数を加速する
fn alternating_harmonic_test() {
	let mut t = BrezinskiThetaSum::basic();
	for k in 0..19 { t += alternating_harmonic(k); }
	assert_close(t.estimate(),std::f64::consts::LN_2,1e-12,"Brezinski θ");
}

#[cfg(test)]
#[test]
/// 対数的に収束する ζ(1.2) でも生の部分和より大幅に良くなる
fn zeta_test() {
	let term = zeta_term(1.2);
	let mut t = BrezinskiThetaSum::basic();
	let mut raw = BasicSum::new();
	for k in 0..10 {
		t += term(k);
		raw += term(k);
	}
	assert!( (raw.estimate()-ZETA_1_2).abs() > 1.0 );
	assert_close(t.estimate(),ZETA_1_2,1e-5,"Brezinski θ ζ(1.2)");
}

#[cfg(test)]
#[test]
/// 列の伸び方と、 0 が続く場合の扱い
fn table_shape_test() {
	let mut t = BrezinskiThetaSum::basic();
	t.reset(0.3_f64);
	for _ in 0..7 { t += 0.0; }
	assert_eq!(t.estimate(),0.3);
	// θ_1 は θ_0 より1つ、 θ_2 は θ_0 より3つ短い
	assert_eq!(t.column(0).map(|c| c.len()),Some(8));
	assert_eq!(t.column(1).map(|c| c.len()),Some(7));
	assert_eq!(t.column(2).map(|c| c.len()),Some(5));
	assert_eq!(t.required_terms(),4);
}

#[cfg(test)]
#[test]
/// 空にした後も列の領域を使い回し、新しく作ったものと同じ値を出す
fn clear_keeps_columns_test() {
	let mut t = BrezinskiThetaSum::basic();
	t.extend((0..19).map(alternating_harmonic));
	let before = t.estimate();
	let order = t.columns.len();
	t.clear();
	assert_eq!(t.column(0),None);
	assert_eq!(t.estimate(),0.0);
	assert_eq!(t.columns.len(),order);
	assert!(t.columns[0].capacity()>=19);

	let mut fresh = BrezinskiThetaSum::basic();
	for k in 0..6 {
		t += alternating_harmonic(k);
		fresh += alternating_harmonic(k);
		assert_eq!(t.estimate(),fresh.estimate());
	}
	assert_eq!(t.column(3).map(|c| c.len()),Some(2));
	assert_eq!(t.column(4),None);
	t.extend((6..19).map(alternating_harmonic));
	assert_eq!(t.estimate(),before);
}
