//! Contract interfaces read by the synchronizer.

use alloy::sol;

sol! {
	/// Registry of the factories deployed by the protocol
	interface IEthItemOrchestrator {
		function factories() external view returns (address[] memory);
	}

	/// Collection contract created by a factory
	interface IEthItemMainInterface {
		event NewItem(uint256 indexed objectId, address indexed tokenAddress);

		function name() external view returns (string memory);
		function symbol() external view returns (string memory);
		function uri() external view returns (string memory);
		function modelVersion() external view returns (uint256);
		function mainInterfaceVersion() external view returns (uint256);
		function interoperableInterfaceModel() external view returns (address, uint256);
		function asInteroperable(uint256 objectId) external view returns (address);
	}

	/// Per item metadata URI of an ERC-1155 collection
	interface IERC1155MetadataURI {
		function uri(uint256 id) external view returns (string memory);
	}

	/// ERC-20 view of a single item
	interface IERC20Metadata {
		function name() external view returns (string memory);
		function symbol() external view returns (string memory);
		function decimals() external view returns (uint8);
	}
}
