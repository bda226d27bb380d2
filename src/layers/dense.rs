use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::math::init::Initializer;
use crate::math::tensor::{format_shape, Tensor};

/// One affine transform `x * weights + bias`.
///
/// `weights` is `input_size x size`, `bias` is `1 x size`.
#[derive(Debug, PartialEq)]
pub struct Layer {
    pub weights: Tensor,
    pub bias: Tensor,
}

impl Layer {
    pub fn zeros(input_size: usize, size: usize) -> Result<Layer> {
        Ok(Layer {
            weights: Tensor::new(input_size, size)?,
            bias: Tensor::new(1, size)?,
        })
    }

    /// Fills weights first, then bias, from the same generator.
    pub fn from_fn<F>(input_size: usize, size: usize, generator: &mut F) -> Result<Layer>
    where
        F: FnMut(usize, usize) -> f32,
    {
        let weights = Tensor::from_fn(input_size, size, &mut *generator)?;
        let bias = Tensor::from_fn(1, size, &mut *generator)?;
        Ok(Layer { weights, bias })
    }

    pub fn random(input_size: usize, size: usize, init: &mut Initializer) -> Result<Layer> {
        Ok(Layer {
            weights: init.random(input_size, size)?,
            bias: init.random(1, size)?,
        })
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows()
    }

    pub fn size(&self) -> usize {
        self.weights.columns()
    }

    /// `activation(input * weights + bias)` for every row of `input`.
    pub fn feed_from(&self, input: &Tensor, activation: ActivationFunction) -> Result<Tensor> {
        let z = input.matmul(&self.weights)?.add(&self.bias)?;
        Ok(z.map(|x| activation.function(x)))
    }

    pub fn zero(&mut self) {
        self.weights.zero();
        self.bias.zero();
    }

    /// `param -= grad * lr` for weights and bias.
    pub fn apply_gradients(&mut self, gradients: &Layer, lr: f32) -> Result<()> {
        descend(&mut self.weights, &gradients.weights, lr)?;
        descend(&mut self.bias, &gradients.bias, lr)
    }

    pub fn copy(&self) -> Layer {
        Layer {
            weights: self.weights.copy(),
            bias: self.bias.copy(),
        }
    }
}

fn descend(param: &mut Tensor, grad: &Tensor, lr: f32) -> Result<()> {
    if param.shape() != grad.shape() {
        return Err(Error::shape_mismatch(
            format_shape(param.shape()),
            format_shape(grad.shape()),
        ));
    }
    for i in 0..param.len() {
        let g = grad.get(i)?;
        param.add_at(i, -g * lr)?;
    }
    Ok(())
}
