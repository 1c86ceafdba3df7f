use burn::tensor::{backend::Backend, Bool, Data, Shape, Tensor};

/// Average embeddings over the sequence dimension, ignoring padding positions.
/// Rows made entirely of padding come out as zeros.
pub fn masked_mean<B: Backend>(
    embeddings: Tensor<B, 3>,    // [batch_size, seq_length, d_model]
    mask_pad: Tensor<B, 2, Bool>, // [batch_size, seq_length], true at padding
) -> Tensor<B, 2> {
    let keep = mask_pad.bool_not().float().unsqueeze_dim::<3>(2);

    let summed = (embeddings * keep.clone()).sum_dim(1).squeeze::<2>(1);
    let counts = keep.sum_dim(1).squeeze::<2>(1).add_scalar(1e-6);

    summed / counts
}

/// Build a float matrix from row-major values
pub fn matrix<B: Backend>(
    values: &[f32],
    rows: usize,
    columns: usize,
    device: &B::Device,
) -> Tensor<B, 2> {
    Tensor::from_data(
        Data::new(values.to_vec(), Shape::new([rows, columns])).convert::<B::FloatElem>(),
        device,
    )
}

#[cfg(test)]
mod tests {
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    use super::*;

    type B = NdArray;

    #[test]
    fn averages_only_unpadded_positions() {
        let device = NdArrayDevice::Cpu;

        let embeddings = Tensor::<B, 3>::from_floats(
            [[[1.0, 2.0], [3.0, 4.0], [100.0, 100.0]], [[5.0, 5.0], [7.0, 7.0], [9.0, 9.0]]],
            &device,
        );
        let mask_pad = Tensor::<B, 2, Bool>::from_bool(
            Data::from([[false, false, true], [true, true, true]]),
            &device,
        );

        let values = masked_mean(embeddings, mask_pad)
            .into_data()
            .convert::<f32>()
            .value;

        assert_eq!(values.len(), 4);
        assert!((values[0] - 2.0).abs() < 1e-3);
        assert!((values[1] - 3.0).abs() < 1e-3);
        assert!(values[2].abs() < 1e-3);
        assert!(values[3].abs() < 1e-3);
    }

    #[test]
    fn builds_matrix_from_rows() {
        let device = NdArrayDevice::Cpu;

        let tensor = matrix::<B>(&[1.0, 0.0, 0.0, 1.0, 0.0, 0.0], 2, 3, &device);

        assert_eq!(tensor.dims(), [2, 3]);
        assert_eq!(
            tensor.into_data().convert::<f32>().value,
            vec![1.0, 0.0, 0.0, 1.0, 0.0, 0.0]
        );
    }
}
