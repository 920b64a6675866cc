//! ## `term`
//! 級数の項として受け入れる数値型を定義するモジュール。
//! 実数、複素数、拡張精度の型を同じ収束加速のコードで扱えるようにする。

use super::*;
use num::traits::NumAssign;
use std::{
	fmt::Debug,
	ops::Neg
};

/// 級数の項として扱える型。
/// 四則演算と絶対値、型に応じた計算機イプシロンなどの問い合わせだけを要求する。
/// `f32`, `f64`, `Complex<f32>`, `Complex<f64>` には実装済みで、拡張精度の型は利用者が実装する。
pub trait Term:
	Copy + Debug + PartialEq + NumAssign + Neg<Output=Self> + Send + Sync + 'static
{
	/// 絶対値や許容誤差を表す実数の型
	type Real: Float + Debug + Send + Sync + 'static;

	/// 絶対値 (複素数ならノルム)
	fn magnitude(&self) -> Self::Real;
	/// 実数から項の型を作る
	fn from_real(x:Self::Real) -> Self;
	/// 添字などの整数を実数の型に変換する
	fn real_from_usize(n:usize) -> Self::Real;
	/// `f64` の定数を実数の型に変換する
	fn real_from_f64(x:f64) -> Self::Real;
	/// NaN を含むか
	fn is_nan(&self) -> bool;
	/// 全ての成分が有限であるか
	fn is_finite(&self) -> bool;

	/// 計算機イプシロン
	fn epsilon() -> Self::Real {
		Self::Real::epsilon()
	}
	/// 0 除算を避けるために置き換える小さな値 (最小の正規化数の10倍)
	fn tiny() -> Self::Real {
		Self::Real::min_positive_value() * Self::real_from_usize(10)
	}
	/// 特異点の代わりに置く大きな値 (有限の最大値)
	fn huge() -> Self::Real {
		Self::Real::max_value()
	}
	/// 整数を項の型に変換する
	fn from_usize(n:usize) -> Self {
		Self::from_real(Self::real_from_usize(n))
	}
	/// NaN ではない無限大を含むか
	fn is_infinite(&self) -> bool {
		!self.is_finite() && !self.is_nan()
	}
}

/// 実数型と複素数型に対して `Term` の実装をまとめて行うマクロ
macro_rules! term_impl {
	( real: $($f:ident)+ ) => { $(
		impl Term for $f {
			type Real = $f;
			#[inline]
			fn magnitude(&self) -> $f { self.abs() }
			#[inline]
			fn from_real(x:$f) -> Self { x }
			#[inline]
			fn real_from_usize(n:usize) -> $f { n as $f }
			#[inline]
			fn real_from_f64(x:f64) -> $f { x as $f }
			#[inline]
			fn is_nan(&self) -> bool { $f::is_nan(*self) }
			#[inline]
			fn is_finite(&self) -> bool { $f::is_finite(*self) }
		}
	)+ };
	( complex: $($f:ident)+ ) => { $(
		impl Term for Complex<$f> {
			type Real = $f;
			#[inline]
			fn magnitude(&self) -> $f { self.norm() }
			#[inline]
			fn from_real(x:$f) -> Self { Complex::new(x,0.0) }
			#[inline]
			fn real_from_usize(n:usize) -> $f { n as $f }
			#[inline]
			fn real_from_f64(x:f64) -> $f { x as $f }
			#[inline]
			fn is_nan(&self) -> bool { self.re.is_nan() || self.im.is_nan() }
			#[inline]
			fn is_finite(&self) -> bool { self.re.is_finite() && self.im.is_finite() }
		}
	)+ };
}
term_impl!( real: f32 f64 );
term_impl!( complex: f32 f64 );



#[cfg(test)]
#[test]
/// 実数と複素数で絶対値や特殊な値の判定が一致するか確認する
fn term_queries_test() {
	let z = Complex::new(3.0_f64,-4.0);
	assert_eq!(z.magnitude(),5.0);
	assert_eq!((-2.5_f64).magnitude(),2.5);
	assert_eq!(<Complex<f64> as Term>::from_real(1.5),Complex::new(1.5,0.0));

	assert!(Complex::new(f64::NAN,0.0).is_nan());
	assert!(Term::is_infinite(&Complex::new(0.0,f64::INFINITY)));
	assert!(!Term::is_infinite(&f64::NAN));

	assert_eq!(<f64 as Term>::tiny(),f64::MIN_POSITIVE*10.0);
	assert_eq!(<f32 as Term>::huge(),f32::MAX);
	assert_eq!(<Complex<f32> as Term>::epsilon(),f32::EPSILON);
}
