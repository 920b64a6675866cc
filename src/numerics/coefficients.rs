//! ## `coefficients`
//! 特殊関数の級数を組み立てる呼び出し側が使う係数のテーブル。
//! テーブルは最初に参照されたときに一度だけ計算され、それ以降は読み取り専用となる。

use super::*;
extern crate once_cell;
use once_cell::sync::Lazy;
use num::{BigInt,BigRational};
type RI = BigRational;

/// テーブルに格納する偶数次のベルヌーイ数 B_{2n} の個数 (n=0..MAX_HALF_ORDER)。
/// `f64` に変換してもオーバーフローしない範囲にとどめる。
pub const MAX_HALF_ORDER:usize = 100;

/// RI 型の分数を生成
fn ratio(num:isize,den:isize) -> RI {
	RI::new(
		BigInt::from(num),
		BigInt::from(den)
	)
}

/// 2項係数を計算します。 `k>n` の場合は 0 を返します。
/// 値が `usize` に収まらない場合 (64 ビット環境では n=67 まで全て収まり、 C(68,34) から溢れる) は `None` を返します。
pub fn binomial_coefficient(n:usize,k:usize) -> Option<usize> {
	if k>n { return Some(0); }
	// (n,k) よりも (n,n-k) の方が計算しやすければ、そちらを利用する
	let k = k.min(n-k);
	// C(n,i+1) = C(n,i)(n−i)/(i+1) は割り切れ、 i ≤ n/2 の間は単調に増える
	(0..k).try_fold(1usize,|a,i| {
		let next = (a as u128) * ((n-i) as u128) / ((i+1) as u128);
		usize::try_from(next).ok()
	})
}

/// 偶数次のベルヌーイ数 B_0, B_2, ..., B_{2·MAX_HALF_ORDER} を有理数のまま並べたテーブル
static BERNOULLI_EVEN:Lazy<Vec<RI>> = Lazy::new(|| {
	let mut list:Vec<RI> = Vec::with_capacity(MAX_HALF_ORDER+1);
	list.push(RI::one());
	for n_half in 1..=MAX_HALF_ORDER {
		let n = n_half*2;
		// B_n = -1/(n+1) Σ_{k<n} C(n+1,k) B_k で、奇数次は B_1 = -1/2 のみが残る
		let b = ratio(-1,(n+1) as isize) *
		list.iter().enumerate()
		.map(|(k_half,b)| {
			let c = BigInt::from(binomial_coefficient_big(n+1,k_half*2));
			b.clone() * RI::from_integer(c)
		})
		.fold(
			ratio(-((n+1) as isize),2),
			|a,b| a+b
		);
		list.push(b);
	}
	list
});

/// `f64` に変換した B_{2n} のテーブル
static BERNOULLI_EVEN_F64:Lazy<Vec<f64>> = Lazy::new(|| {
	BERNOULLI_EVEN.iter()
	.map(|b| b.to_f64().unwrap_or(f64::NAN) )
	.collect()
});

/// ベルヌーイ数の計算の途中で現れる大きな2項係数を多倍長整数で計算します
fn binomial_coefficient_big(n:usize,k:usize) -> BigInt {
	let k = k.min(n-k);
	(0..k).fold(
		BigInt::one(),
		|a,i| a * BigInt::from(n-i) / BigInt::from(i+1)
	)
}

/// ベルヌーイ数 B_n を有理数で返します (B_1 = -1/2 の規約)。
/// テーブルの範囲を超えた偶数次の場合は `None` を返します。
pub fn bernoulli_number(n:usize) -> Option<RI> {
	match n {
		1 => Some(ratio(-1,2)),
		n if n%2==1 => Some(RI::zero()),
		n => BERNOULLI_EVEN.get(n/2).cloned()
	}
}

/// 偶数次のベルヌーイ数 B_{2n} を `f64` で返します。テーブルの範囲外なら `None` を返します。
pub fn bernoulli_2n(n:usize) -> Option<f64> {
	BERNOULLI_EVEN_F64.get(n).copied()
}



#[cfg(test)]
#[test]
/// 既知の値と比較する
fn bernoulli_number_test() {
	assert_eq!(bernoulli_number(0),Some(RI::one()));
	assert_eq!(bernoulli_number(1),Some(ratio(-1,2)));
	assert_eq!(bernoulli_number(2),Some(ratio(1,6)));
	assert_eq!(bernoulli_number(7),Some(RI::zero()));
	assert_eq!(bernoulli_number(12),Some(ratio(-691,2730)));
	assert_eq!(bernoulli_number(2*MAX_HALF_ORDER+2),None);

	assert_eq!(bernoulli_2n(2),Some(-1.0/30.0));
	let b_200 = bernoulli_2n(MAX_HALF_ORDER).unwrap();
	assert!(b_200.is_finite() && b_200.abs()>1e200);
}

#[cfg(test)]
#[test]
fn binomial_coefficient_test() {
	assert_eq!(binomial_coefficient(10,3),Some(120));
	assert_eq!(binomial_coefficient(10,7),Some(120));
	assert_eq!(binomial_coefficient(5,0),Some(1));
	assert_eq!(binomial_coefficient(3,5),Some(0));
	assert_eq!(binomial_coefficient(1000,3),Some(166167000));
}

#[cfg(test)]
#[test]
/// `usize` に収まらない2項係数は `None` になり、収まるものは多倍長整数の値と一致する
fn binomial_coefficient_overflow_test() {
	assert_eq!(binomial_coefficient(67,33),usize::try_from(14226520737620288370_u64).ok());
	assert_eq!(binomial_coefficient(68,34),None);
	assert_eq!(binomial_coefficient(68,1),Some(68));
	assert_eq!(binomial_coefficient(200,100),None);
	for n in [20,40,60] {
		for k in 0..=n {
			let big = binomial_coefficient_big(n,k);
			assert_eq!(binomial_coefficient(n,k).map(BigInt::from),Some(big));
		}
	}
	assert_eq!(binomial_coefficient_big(60,30).to_string(),"118264581564861424");
}
