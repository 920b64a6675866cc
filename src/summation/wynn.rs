//! ## `wynn`
//! Wynn の ε アルゴリズム

use super::*;

/// Wynn の ε アルゴリズム。
/// 第0列に内側のアキュムレータの推定値 (部分和) を並べ、
/// ε_{k+1}(n) = ε_{k-1}(n+1) + 1 / (ε_k(n+1) − ε_k(n)) で三角形のテーブルを埋める。
/// 偶数列が極限の推定値で、奇数列は途中の量である。
///
/// 差が 0 に近いときは極とみなして非常に大きな値を入れ、エラーにはしない。
/// 推定値は得られている最も高い偶数列の値だが、その大きな値に汚染されている場合は1つ低い偶数列に戻る。
///
/// `clear` は各列を空にするだけで、確保した列はそのまま次の計算に使う。
#[derive(Debug,Clone)]
pub struct WynnEpsilonSum<S,T:Term> {
	inner: S,
	/// `columns[k][n]` = ε_k(n)
	columns: Vec<Vec<T>>
}

impl<S:Accumulator<T>,T:Term> WynnEpsilonSum<S,T> {
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

	/// テーブルの第 k 列 ε_k(0), ε_k(1), ... を返す。まだ列がなければ `None`
	pub fn column(&self,k:usize) -> Option<&[T]> {
		self.columns.get(k).filter(|c| !c.is_empty()).map(|c| c.as_slice())
	}

	/// テーブルの列の数
	pub fn order(&self) -> usize {
		self.columns.iter().take_while(|c| !c.is_empty()).count()
	}

	/// 新しい部分和を第0列に加え、反対角線上の値を順に求める
	fn push(&mut self,s:T) {
		let huge = T::from_real(T::huge());
		if self.columns.is_empty() { self.columns.push(vec![]); }
		self.columns[0].push(s);
		let last = self.columns[0].len()-1;
		for k in 1..=last {
			if self.columns.len()<=k { self.columns.push(Vec::with_capacity(last+1)); }
			let n = last-k;
			let diff = self.columns[k-1][n+1] - self.columns[k-1][n];
			let value = if diff.magnitude() <= T::tiny() {
				log_trace!("Wynn ε: ε_{}({}) の分母が 0 に近いため極として扱います",k,n);
				huge
			} else {
				let before = if k>=2 { self.columns[k-2][n+1] } else { T::zero() };
				before + T::one()/diff
			};
			self.columns[k].push(value);
		}
	}

	/// 大きな値に汚染されていない、最も高い偶数列の最新の値
	fn best(&self) -> Option<T> {
		let first = self.columns.first()?;
		let top = self.order().checked_sub(1)?;
		let limit = T::huge() * T::real_from_f64(0.01);
		let mut k = top - top%2;
		while k>0 {
			if let Some(&v) = self.columns[k].last() {
				if v.is_nan() { return Some(v); }
				if v.is_finite() && v.magnitude() < limit { return Some(v); }
			}
			k -= 2;
		}
		first.last().copied()
	}
}

impl<T:Term> WynnEpsilonSum<BasicSum<T>,T> {
	/// 単純な和を包んだ ε アルゴリズムを作る
	pub fn basic() -> Self {
		Self::new(BasicSum::new())
	}
}

impl<S:Accumulator<T>,T:Term> Accumulator<T> for WynnEpsilonSum<S,T> {
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
	fn required_terms(&self) -> usize { self.inner.required_terms()+2 }
}



#[cfg(test)]
use crate::summation::test_helpers::*;

#[cfg(test)]
#[test]
/// 第0列は生の部分和の列と完全に一致する
fn column_zero_test() {
	let mut w = WynnEpsilonSum::basic();
	let mut raw = BasicSum::new();
	let mut partial = vec![];
	for k in 0..12 {
		let t = alternating_harmonic(k);
		w += t;
		raw += t;
		partial.push(raw.estimate());
		assert_eq!(w.column(0),Some(partial.as_slice()));
	}
	// 第 k 列の長さは 12-k
	for k in 0..12 {
		assert_eq!(w.column(k).map(|c| c.len()),Some(12-k));
	}
	assert_eq!(w.column(12),None);
}

#[cfg(test)]
#[test]
/// 交代調和級数を加速する
fn alternating_harmonic_test() {
	let mut w = WynnEpsilonSum::basic();
	for k in 0..15 { w += alternating_harmonic(k); }
	assert_close(w.estimate(),std::f64::consts::LN_2,1e-10,"Wynn ε");
}

#[cfg(test)]
#[test]
/// 0 が続く場合は極の扱いにより初項がそのまま返る
fn constant_sequence_test() {
	let mut w = WynnEpsilonSum::basic();
	w.reset(0.3_f64);
	for _ in 0..7 { w += 0.0; }
	assert_eq!(w.estimate(),0.3);
	assert!(w.column(1).unwrap().iter().all(|v| *v==f64::MAX));
}

#[cfg(test)]
#[test]
/// 補償付きの和を内側に使っても同じ極限に近づく
fn kahan_inner_test() {
	let mut w = WynnEpsilonSum::new(KahanSum::new());
	w.extend((0..15).map(alternating_harmonic));
	assert_close(w.estimate(),std::f64::consts::LN_2,1e-10,"Wynn ε (Kahan)");
	w.clear();
	assert_eq!(w.num_terms(),0);
	assert_eq!(w.order(),0);
}

#[cfg(test)]
#[test]
/// 空にした後も列の領域を使い回し、新しく作ったものと同じ値を出す
fn clear_keeps_columns_test() {
	let mut w = WynnEpsilonSum::basic();
	w.extend((0..15).map(alternating_harmonic));
	let before = w.estimate();
	w.clear();
	assert_eq!(w.order(),0);
	assert_eq!(w.column(0),None);
	assert_eq!(w.estimate(),0.0);
	assert_eq!(w.columns.len(),15);
	assert!(w.columns[0].capacity()>=15);

	let mut fresh = WynnEpsilonSum::basic();
	for k in 0..9 {
		w += alternating_harmonic(k);
		fresh += alternating_harmonic(k);
		assert_eq!(w.estimate(),fresh.estimate());
		assert_eq!(w.order(),fresh.order());
	}
	assert_eq!(w.column(9),None);
	w.extend((9..15).map(alternating_harmonic));
	assert_eq!(w.estimate(),before);
}
