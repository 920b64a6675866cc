//! ## `table`
//! Levin 型と Weniger 型の変換が共有する再帰的なテーブルの計算エンジン。
//!
//! 部分和 s_n と剰余の推定 ω_n から N_0(n) = s_n/ω_n, D_0(n) = 1/ω_n を第0列に置き、
//! X_k(n) = X_{k-1}(n+1) − c_k(n) X_{k-1}(n) で分子と分母のテーブルを伸ばす。
//! 推定値は最も高い次数の N_K(0)/D_K(0) である。
//! 重み c_k(n) は `Recurrence` を実装した型が、剰余の推定の仕方は `RemainderEstimate` が決める。

use super::*;
use std::marker::PhantomData;

/// 剰余の推定 ω_n の選び方。 a_n は内側のアキュムレータの推定値の差分 s_n − s_{n-1} である。
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub enum RemainderEstimate {
	/// ω_n = a_n
	T,
	/// ω_n = (β+n) a_n
	U,
	/// ω_n = a_{n+1} (次の項が来るまで1項遅れる)
	D,
	/// ω_n = a_n a_{n+1} / (a_n − a_{n+1}) (次の項が来るまで1項遅れる)
	V
}

impl RemainderEstimate {
	/// 次の項を見てから ω_n が決まるか
	pub fn needs_next_term(&self) -> bool {
		matches!(self,Self::D|Self::V)
	}
}

/// 分子と分母のテーブルを伸ばす漸化式の重み c_k(n) を与えるトレイト
pub trait Recurrence {
	/// 変換の名前 (ログ出力用)
	const NAME: &'static str;
	/// 次数 k (k≥1) の列の第 n 要素を作るときに、 X_{k-1}(n) に掛ける重み
	fn weight<R:Float>(beta:R,n:R,k:usize) -> R;
}

/// Levin 型や Weniger 型の変換を行うアキュムレータ。
/// 型パラメータ `R` で漸化式を、 `remainder` で剰余の推定を選ぶ。
#[derive(Debug,Clone)]
pub struct TableSum<S,T:Term,R> {
	inner: S,
	remainder: RemainderEstimate,
	beta: T::Real,
	/// `numer[k][n]` = N_k(n)
	numer: Vec<Vec<T>>,
	/// `denom[k][n]` = D_k(n)
	denom: Vec<Vec<T>>,
	/// 内側のアキュムレータの直前の推定値
	last_sum: Option<T>,
	/// d, v 型で ω_n が決まるのを待っている (s_n, a_n)
	pending: Option<(T,T)>,
	/// 最後に採用した変換の値
	value: Option<T>,
	_recurrence: PhantomData<R>
}

impl<S:Accumulator<T>,T:Term,R:Recurrence> TableSum<S,T,R> {
	/// 内側のアキュムレータと剰余の推定の仕方を与えて作る。 β は 1 とする
	pub fn new(inner:S,remainder:RemainderEstimate) -> Self {
		Self::with_beta(inner,remainder,T::Real::one())
	}

	/// β を指定して作る。 β は正の値とする
	pub fn with_beta(inner:S,remainder:RemainderEstimate,beta:T::Real) -> Self {
		let mut s = Self {
			inner, remainder, beta,
			numer: vec![], denom: vec![],
			last_sum: None, pending: None, value: None,
			_recurrence: PhantomData
		};
		if s.inner.num_terms()>0 {
			let e = s.inner.estimate();
			s.accept(e);
		}
		s
	}

	/// 内側のアキュムレータへの参照
	pub fn inner(&self) -> &S { &self.inner }
	/// 剰余の推定の仕方
	pub fn remainder(&self) -> RemainderEstimate { self.remainder }
	/// β
	pub fn beta(&self) -> T::Real { self.beta }
	/// 現在のテーブルの行数 (第0列の長さ)
	pub fn rows(&self) -> usize { self.numer.first().map_or(0,|c| c.len()) }

	/// 第 k 列の分子と分母を返す
	pub fn column(&self,k:usize) -> Option<(&[T],&[T])> {
		let numer = self.numer.get(k).filter(|c| !c.is_empty())?;
		Some((numer.as_slice(),self.denom.get(k)?.as_slice()))
	}

	/// 分子と分母の各列を空にする。確保した列は使い回す
	fn clear_table(&mut self) {
		for c in self.numer.iter_mut().chain(self.denom.iter_mut()) { c.clear(); }
		self.value = None;
	}

	/// 内側のアキュムレータの新しい推定値を受け取り、剰余の推定が決まったものからテーブルに加える
	fn accept(&mut self,s:T) {
		let a = match self.last_sum {
			Some(prev) => s - prev,
			None => s
		};
		self.last_sum = Some(s);
		match self.remainder {
			RemainderEstimate::T => self.push_row(s,a),
			RemainderEstimate::U => {
				let n = T::real_from_usize(self.rows());
				self.push_row(s,a*T::from_real(self.beta+n));
			},
			RemainderEstimate::D => {
				if let Some((s_prev,_)) = self.pending { self.push_row(s_prev,a); }
				self.pending = Some((s,a));
			},
			RemainderEstimate::V => {
				if let Some((s_prev,a_prev)) = self.pending {
					let diff = a_prev - a;
					let omega = if diff.is_zero() {
						T::from_real(T::Real::infinity())
					} else {
						a_prev*a/diff
					};
					self.push_row(s_prev,omega);
				}
				self.pending = Some((s,a));
			}
		}
	}

	/// 第0列に (s_n, ω_n) を加え、反対角線上の値を求めて推定値を更新する
	fn push_row(&mut self,s:T,omega:T) {
		// ω が 0 や無限大なら級数が停滞しているので、テーブルを作り直す
		if omega.is_zero() || omega.is_infinite() {
			if self.rows()>0 {
				log_debug!("{}: 剰余の推定 {:?} が退化したためテーブルを作り直します",R::NAME,omega);
			}
			self.clear_table();
			return;
		}
		if self.numer.is_empty() {
			self.numer.push(vec![]);
			self.denom.push(vec![]);
		}
		let inv = T::one()/omega;
		self.numer[0].push(s*inv);
		self.denom[0].push(inv);

		let last = self.numer[0].len()-1;
		for k in 1..=last {
			if self.numer.len()<=k {
				self.numer.push(Vec::with_capacity(last+1));
				self.denom.push(Vec::with_capacity(last+1));
			}
			let n = last-k;
			let c = T::from_real(R::weight(self.beta,T::real_from_usize(n),k));
			let num = self.numer[k-1][n+1] - c*self.numer[k-1][n];
			let den = self.denom[k-1][n+1] - c*self.denom[k-1][n];
			self.numer[k].push(num);
			self.denom[k].push(den);
		}
		if last==0 { return; }

		// 分子と分母が打ち消し合って分母が 0 に近い場合は、直前の推定値を保つ
		let num = self.numer[last][0];
		let den = self.denom[last][0];
		if den.magnitude() <= T::tiny() {
			log_trace!("{}: 分母 {:?} が 0 に近いため直前の推定値を保ちます",R::NAME,den);
			return;
		}
		let value = num/den;
		if value.is_infinite() {
			log_trace!("{}: 変換の値が発散したため直前の推定値を保ちます",R::NAME);
			return;
		}
		self.value = Some(value);
	}
}

impl<S:Accumulator<T>,T:Term,R:Recurrence> Accumulator<T> for TableSum<S,T,R> {
	fn incorporate(&mut self,term:T) {
		self.inner.incorporate(term);
		let s = self.inner.estimate();
		self.accept(s);
	}
	fn estimate(&self) -> T {
		// 2行以上揃うまでは変換の値に意味がないので、生の推定値を返す
		match self.value {
			Some(v) if self.rows()>=2 => v,
			_ => self.inner.estimate()
		}
	}
	fn num_terms(&self) -> usize { self.inner.num_terms() }
	fn clear(&mut self) {
		self.inner.clear();
		self.clear_table();
		self.last_sum = None;
		self.pending = None;
	}
	fn required_terms(&self) -> usize {
		let own = if self.remainder.needs_next_term() { 2 } else { 1 };
		self.inner.required_terms()+own
	}
}



#[cfg(test)]
/// 重みが全て 1 の漸化式。 k 次の値は有限差分になる
struct Unit;
#[cfg(test)]
impl Recurrence for Unit {
	const NAME: &'static str = "unit";
	fn weight<R:Float>(_:R,_:R,_:usize) -> R { R::one() }
}

#[cfg(test)]
#[test]
/// 第0列に s/ω と 1/ω が並び、高次の列が1つずつ短くなる
fn table_layout_test() {
	let mut t:TableSum<_,f64,Unit> = TableSum::new(BasicSum::new(),RemainderEstimate::T);
	for x in [1.0,0.5,0.25,0.125] { t += x; }
	let (n0,d0) = t.column(0).unwrap();
	assert_eq!(d0,&[1.0,2.0,4.0,8.0]);
	assert_eq!(n0,&[1.0,3.0,7.0,15.0]);
	let (n1,d1) = t.column(1).unwrap();
	assert_eq!(n1,&[2.0,4.0,8.0]);
	assert_eq!(d1,&[1.0,2.0,4.0]);
	assert_eq!(t.column(3).map(|(n,_)| n.len()),Some(1));
	assert_eq!(t.rows(),4);
}

#[cfg(test)]
#[test]
/// d 型は1項遅れて行が増え、 ω が 0 なら作り直す
fn lagging_remainder_test() {
	let mut t:TableSum<_,f64,Unit> = TableSum::new(BasicSum::new(),RemainderEstimate::D);
	t += 1.0;
	assert_eq!(t.rows(),0);
	assert_eq!(t.estimate(),1.0);
	t += 0.5;
	assert_eq!(t.rows(),1);
	t += 0.0;
	assert_eq!(t.rows(),0);
	assert_eq!(t.column(0),None);
	assert_eq!(t.estimate(),1.5);
	assert_eq!(t.required_terms(),3);
}

#[cfg(test)]
#[test]
/// 作り直した後のテーブルは、新しく作ったものと同じ形になる
fn rebuilt_table_test() {
	let mut t:TableSum<_,f64,Unit> = TableSum::new(BasicSum::new(),RemainderEstimate::T);
	for x in [1.0,0.5,0.25,0.125] { t += x; }
	t.clear();
	assert_eq!(t.rows(),0);
	assert_eq!(t.column(0),None);
	assert_eq!(t.numer.len(),4);
	for x in [1.0,0.5] { t += x; }
	let (n0,d0) = t.column(0).unwrap();
	assert_eq!(n0,&[1.0,3.0]);
	assert_eq!(d0,&[1.0,2.0]);
	assert_eq!(t.column(1).map(|(n,_)| n.len()),Some(1));
	assert_eq!(t.column(2),None);
}
