//! ## `continued_fraction`
//! 一般化連分数 b₀ + a₁/(b₁ + a₂/(b₂ + …)) を修正 Lentz 法で評価する

use super::*;
use std::marker::PhantomData;

/// 反復回数の上限の既定値
pub const DEFAULT_MAX_ITERATIONS:usize = 1000;

/// 係数を与える2つの関数 a(k,x) (k≥1) と b(k,x) (k≥0) で定まる連分数
/// b₀(x) + a₁(x)/(b₁(x) + a₂(x)/(b₂(x) + …))。
///
/// 評価のたびに前方から近似分数の比 C_k D_k を掛けていき、比が 1 に十分近づいたら終える。
/// 途中の C_k, D_k が 0 になる場合は小さな値に置き換えて割り算を続ける。
/// 置き換える値の既定は最小の正規化数の平方根で、その2乗も正規化数に収まる。
/// 複素数の割り算は除数の絶対値の2乗を経由するので、これより小さくすると 0 除算になる。
/// 状態を持たないので、同じ連分数を異なる引数で何度でも (並列にも) 評価できる。
///
/// ```
/// use summation::prelude::*;
/// // tan x = x/(1 − x²/(3 − x²/(5 − …)))
/// let tan = ContinuedFraction::new(
/// 	|k,x:f64| if k==1 { x } else { -x*x },
/// 	|k,_| if k==0 { 0.0 } else { (2*k-1) as f64 }
/// );
/// let value = tan.evaluate(1.0).unwrap();
/// assert!( (value-1.0_f64.tan()).abs() < 1e-14 );
/// ```
#[derive(Clone)]
pub struct ContinuedFraction<A,B,T:Term> {
	a: A,
	b: B,
	tolerance: T::Real,
	max_iterations: usize,
	tiny: T::Real,
	_term: PhantomData<fn(T)->T>
}

impl<A,B,T> ContinuedFraction<A,B,T>
where
	T: Term,
	A: Fn(usize,T) -> T,
	B: Fn(usize,T) -> T
{
	/// 係数の関数から作る。許容誤差は計算機イプシロン、反復回数の上限は `DEFAULT_MAX_ITERATIONS`
	pub fn new(a:A,b:B) -> Self {
		Self {
			a, b,
			tolerance: T::epsilon(),
			max_iterations: DEFAULT_MAX_ITERATIONS,
			tiny: T::Real::min_positive_value().sqrt(),
			_term: PhantomData
		}
	}

	/// 収束判定 |C_k D_k − 1| < tolerance の許容誤差を設定する
	pub fn tolerance(mut self,tolerance:T::Real) -> Self {
		self.tolerance = tolerance;
		self
	}

	/// 反復回数の上限を設定する
	pub fn max_iterations(mut self,max_iterations:usize) -> Self {
		self.max_iterations = max_iterations;
		self
	}

	/// 0 の代わりに置く小さな値を設定する。これより絶対値が小さい中間値は全て置き換える。
	/// 複素数の項では、2乗が正規化数に収まる値でなければならない
	pub fn tiny(mut self,tiny:T::Real) -> Self {
		self.tiny = tiny;
		self
	}

	/// 引数 x における連分数の値を求める
	pub fn evaluate(&self,x:T) -> Result<T,ContinuedFractionError> {
		self.evaluate_counting(x).map(|(value,_)| value)
	}

	/// 引数 x における連分数の値と、収束までに要した段数を求める
	pub fn evaluate_counting(&self,x:T) -> Result<(T,usize),ContinuedFractionError> {
		if x.is_nan() {
			return Err(ContinuedFractionError::NotANumber { stage: 0 });
		}
		let tiny = T::from_real(self.tiny);
		let nonzero = |v:T| if v.magnitude() < self.tiny { tiny } else { v };

		let b0 = (self.b)(0,x);
		if b0.is_nan() {
			return Err(ContinuedFractionError::NotANumber { stage: 0 });
		}
		let mut f = nonzero(b0);
		let mut c = f;
		let mut d = T::zero();
		for k in 1..=self.max_iterations {
			let ak = (self.a)(k,x);
			let bk = (self.b)(k,x);
			if ak.is_nan() || bk.is_nan() {
				return Err(ContinuedFractionError::NotANumber { stage: k });
			}
			// ここで打ち切ると 0/0 を 1 とみなしたまま「収束」してしまう
			if ak.is_zero() && bk.is_zero() {
				log_warn!("連分数: 第 {} 段で a_k = b_k = 0 となりました",k);
				return Err(ContinuedFractionError::Indeterminate { stage: k });
			}
			d = T::one() / nonzero(bk + ak*d);
			c = nonzero(bk + ak/c);
			let delta = c*d;
			f *= delta;
			if f.is_nan() {
				log_warn!("連分数: 第 {} 段で値が NaN になりました (x = {:?})",k,x);
				return Err(ContinuedFractionError::NotANumber { stage: k });
			}
			if (delta-T::one()).magnitude() < self.tolerance {
				log_trace!("連分数: {} 段で収束しました",k);
				return Ok((f,k));
			}
		}
		log_warn!("連分数: {} 回の反復で収束しませんでした (x = {:?})",self.max_iterations,x);
		Err(ContinuedFractionError::NonConvergence { iterations: self.max_iterations })
	}

	/// 複数の引数で連分数を評価する。 `parallel` フィーチャーが有効なら並列に評価する
	#[cfg(feature="parallel")]
	pub fn evaluate_grid(&self,xs:&[T]) -> Vec<Result<T,ContinuedFractionError>>
	where A: Sync, B: Sync {
		use rayon::prelude::*;
		xs.par_iter().map(|&x| self.evaluate(x) ).collect()
	}

	/// 複数の引数で連分数を評価する。 `parallel` フィーチャーが有効なら並列に評価する
	#[cfg(not(feature="parallel"))]
	pub fn evaluate_grid(&self,xs:&[T]) -> Vec<Result<T,ContinuedFractionError>> {
		xs.iter().map(|&x| self.evaluate(x) ).collect()
	}
}

impl<A,B,T:Term> std::fmt::Debug for ContinuedFraction<A,B,T> {
	fn fmt(&self,f:&mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ContinuedFraction")
		.field("tolerance",&self.tolerance)
		.field("max_iterations",&self.max_iterations)
		.field("tiny",&self.tiny)
		.finish_non_exhaustive()
	}
}



/// このモジュールからクレートの `prelude` でアクセスできるようにするアイテムをまとめたもの
pub(crate) mod for_prelude {
	pub use super::ContinuedFraction;
}



#[cfg(test)]
/// erfc(x) = e^{−x²}/√π · 1/(x + (1/2)/(x + 1/(x + (3/2)/(x + …))))
fn erfc_fraction() -> ContinuedFraction<impl Fn(usize,f64)->f64,impl Fn(usize,f64)->f64,f64> {
	ContinuedFraction::new(
		|k,_| if k==1 { 1.0 } else { (k-1) as f64/2.0 },
		|k,x| if k==0 { 0.0 } else { x }
	)
}

#[cfg(test)]
fn erfc(x:f64) -> Result<f64,ContinuedFractionError> {
	let f = erfc_fraction().evaluate(x)?;
	Ok( f*(-x*x).exp()/std::f64::consts::PI.sqrt() )
}

#[cfg(test)]
#[test]
/// 相補誤差関数を 10 桁以上の精度で再現する
fn erfc_test() {
	let value = erfc(2.0).unwrap();
	let expected = 0.004677734981047266;
	assert!( ((value-expected)/expected).abs() < 1e-10, "{} != {}",value,expected );
	let (_,stages) = erfc_fraction().evaluate_counting(2.0).unwrap();
	assert!(stages>10 && stages<100);
}

#[cfg(test)]
#[test]
/// tan 1 の連分数展開
fn tangent_test() {
	let tan = ContinuedFraction::new(
		|k,x:f64| if k==1 { x } else { -x*x },
		|k,_| if k==0 { 0.0 } else { (2*k-1) as f64 }
	);
	let value = tan.evaluate(1.0).unwrap();
	assert!( (value-1.0_f64.tan()).abs() < 1e-14 );
}

#[cfg(test)]
#[test]
/// 収束しない連分数は値を返さずにエラーとする
fn non_convergence_test() {
	let cf = ContinuedFraction::new(|_,_:f64| 1.0,|_,_| 0.0).max_iterations(50);
	let err = cf.evaluate(1.0).unwrap_err();
	assert_eq!(err,ContinuedFractionError::NonConvergence { iterations: 50 });
	assert!(err.is_non_convergence());

	// 4段目以降 a_k = b_k = 0 の場合、そのまま続けると誤った値で「収束」してしまう
	let cf = ContinuedFraction::new(
		|k,_:f64| if k<=3 { 1.0 } else { 0.0 },
		|k,_| if k==0 || k>3 { 0.0 } else { 1.0 }
	);
	let err = cf.evaluate(1.0).unwrap_err();
	assert_eq!(err,ContinuedFractionError::Indeterminate { stage: 4 });
	assert!(err.is_non_convergence());
}

#[cfg(test)]
#[test]
/// NaN の引数は値を返さない
fn nan_argument_test() {
	let err = erfc_fraction().evaluate(f64::NAN).unwrap_err();
	assert_eq!(err,ContinuedFractionError::NotANumber { stage: 0 });
	assert!(!err.is_non_convergence());
}

#[cfg(test)]
#[test]
/// 途中で打ち切った段数が上限より少ないと収束しない
fn builder_test() {
	let cf = erfc_fraction().max_iterations(20).tolerance(1e-12);
	assert!(cf.evaluate(2.0).unwrap_err().is_non_convergence());
	let cf = erfc_fraction().tolerance(1e-6).tiny(1e-300);
	let (_,loose) = cf.evaluate_counting(2.0).unwrap();
	let (_,tight) = erfc_fraction().evaluate_counting(2.0).unwrap();
	assert!(loose<tight);
}

#[cfg(test)]
#[test]
/// 複数の引数での評価は1つずつの評価と一致する
fn grid_test() {
	let xs = [1.0,2.0,3.0,4.0];
	let expected = [0.15729920705028513,0.004677734981047266,2.209049699858544e-05,1.541725790028002e-08];
	let cf = erfc_fraction();
	let values = cf.evaluate_grid(&xs);
	assert_eq!(values.len(),4);
	for ((x,v),e) in xs.iter().zip(values).zip(expected) {
		let v = v.unwrap() * (-x*x).exp() / std::f64::consts::PI.sqrt();
		assert!( ((v-e)/e).abs() < 1e-12, "erfc({}) = {} != {}",x,v,e );
	}
}

#[cfg(test)]
#[test]
/// 複素数の引数でも評価できる。 tan(i) = i tanh 1
fn complex_argument_test() {
	let tan = ContinuedFraction::new(
		|k,z:Complex<f64>| if k==1 { z } else { -z*z },
		|k,_| if k==0 { Complex::new(0.0,0.0) } else { Complex::new((2*k-1) as f64,0.0) }
	);
	let value = tan.evaluate(Complex::new(0.0,1.0)).unwrap();
	assert!( (value-Complex::new(0.0,1.0_f64.tanh())).norm() < 1e-14 );
	let z = Complex::new(0.5,0.5);
	let value = tan.evaluate(z).unwrap();
	assert!( (value-z.tan()).norm() < 1e-14, "{} != {}",value,z.tan() );
	let tan32 = ContinuedFraction::new(
		|k,z:Complex<f32>| if k==1 { z } else { -z*z },
		|k,_| if k==0 { Complex::new(0.0,0.0) } else { Complex::new((2*k-1) as f32,0.0) }
	);
	let value = tan32.evaluate(Complex::new(0.0,1.0)).unwrap();
	assert!( (value-Complex::new(0.0,1.0_f32.tanh())).norm() < 1e-6 );
}

#[cfg(test)]
#[test]
/// 途中で値が NaN になったら上限まで反復せずにエラーとする
fn intermediate_nan_test() {
	let cf = ContinuedFraction::new(
		|k,_:f64| if k==2 { f64::INFINITY } else { 1.0 },
		|_,_| 1.0
	);
	let err = cf.evaluate(1.0).unwrap_err();
	assert_eq!(err,ContinuedFractionError::NotANumber { stage: 2 });
	assert!(!err.is_non_convergence());
}
