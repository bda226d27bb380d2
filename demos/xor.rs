use tensorlib::{
    backprop, learn, ActivationFunction, Dataset, Initializer, Network, NetworkSpec, Tensor,
};

fn main() -> tensorlib::Result<()> {
    let spec = NetworkSpec::new(vec![2, 2, 1], ActivationFunction::Sigmoid);
    let mut network = Network::new(&spec, &mut Initializer::seeded(28))?;
    let mut gradients = Network::zeros_like(&network)?;

    // One row-major block; inputs and outputs are views into it.
    let rows: [[f32; 3]; 4] = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 1.0],
        [0.0, 1.0, 1.0],
        [1.0, 1.0, 0.0],
    ];
    let block = Tensor::from_slice(4, 3, &rows.concat())?;
    let data = Dataset::split(&block, 2)?;

    let epochs = 20_000;
    for epoch in 0..epochs {
        let loss = backprop(&mut network, &mut gradients, &data.inputs, &data.outputs)?;
        learn(&mut network, &gradients, 0.1)?;
        if epoch % 2_000 == 0 {
            println!("Epoch {epoch}: loss = {loss:.6}");
        }
    }

    for row in 0..data.len() {
        let input = data.inputs.view_row(row)?;
        let output = network.evaluate(&input)?;
        println!("Input: {:?} -> Output: {:.4}", input.to_vec(), output.get(0)?);
    }

    Ok(())
}
